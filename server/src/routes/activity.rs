//! Passthrough to the public random-activity API.

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Forward one GET to the upstream API and return its JSON body verbatim.
/// Any failure — connect error, non-2xx, unparseable body — becomes a 503.
pub async fn random_activity(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let response = state
        .http
        .get(&state.activity_url)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!("activity API request failed: {e}");
            ApiError::ActivityUnavailable
        })?;

    if !response.status().is_success() {
        tracing::warn!("activity API answered {}", response.status());
        return Err(ApiError::ActivityUnavailable);
    }

    let body: Value = response.json().await.map_err(|e| {
        tracing::warn!("activity API returned an unreadable body: {e}");
        ApiError::ActivityUnavailable
    })?;

    Ok(Json(body))
}
