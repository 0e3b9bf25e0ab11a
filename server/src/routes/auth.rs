//! Registration, login, and logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::auth::{self, CurrentUser};
use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;
use crate::validation::{extract, rules, ValidationErrors};

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut errors = ValidationErrors::default();
    rules::require_string(&body, "name", &mut errors);
    rules::max_chars(&body, "name", 255, &mut errors);
    rules::require_email(&body, "email", &mut errors);
    rules::require_string(&body, "password", &mut errors);
    rules::min_chars(&body, "password", 8, &mut errors);

    let email = extract::string(&body, "email")
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if !email.is_empty() {
        let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(&email)
            .fetch_one(&state.pool)
            .await?;
        if taken > 0 {
            errors.add("email", "The email has already been taken.");
        }
    }

    errors.into_result()?;

    let name = extract::string(&body, "name")
        .unwrap_or_default()
        .trim()
        .to_string();
    let password = extract::string(&body, "password").unwrap_or_default();
    let password_hash = auth::hash_password(&password)?;

    let now = Utc::now();
    let user: User = sqlx::query_as(
        "INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
         VALUES (?, ?, ?, 'user', ?, ?)
         RETURNING *",
    )
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(&state.pool)
    .await?;

    let token = auth::issue(&state.pool, user.id).await?;

    tracing::info!(user = user.id, "registered new user");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": user.to_info(),
            "token": token,
            "token_type": "Bearer",
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = ValidationErrors::default();
    rules::require_email(&body, "email", &mut errors);
    rules::require_string(&body, "password", &mut errors);
    errors.into_result()?;

    let email = extract::string(&body, "email")
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let password = extract::string(&body, "password").unwrap_or_default();

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?;

    // Same response whether the email is unknown or the password is wrong.
    let Some(user) = user else {
        return Err(ApiError::InvalidCredentials);
    };

    let valid = auth::verify_password(&password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let token = auth::issue(&state.pool, user.id).await?;

    Ok(Json(json!({
        "message": "Login successful",
        "user": user.to_info(),
        "token": token,
        "token_type": "Bearer",
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    auth::revoke(&state.pool, &current.token).await?;

    Ok(Json(json!({ "message": "Successfully logged out" })))
}
