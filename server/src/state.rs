use std::time::Duration;

use sqlx::SqlitePool;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub http: reqwest::Client,
    /// Full URL of the upstream random-activity endpoint.
    pub activity_url: String,
}

impl AppState {
    /// Fails only when the HTTP client cannot be constructed, which a caller
    /// at startup should treat as fatal.
    pub fn new(pool: SqlitePool, activity_url: String) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            pool,
            http,
            activity_url,
        })
    }
}
