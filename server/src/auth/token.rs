//! Opaque bearer tokens backed by the `api_tokens` table.
//!
//! A token is 20 random bytes hex-encoded (40 characters). Issue on
//! register/login, revoke on logout; a request authenticates by joining the
//! presented token back to its user.

use chrono::Utc;
use rand::RngCore;
use sqlx::SqlitePool;

use crate::models::User;

const TOKEN_NAME: &str = "auth_token";

fn generate() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Create and store a fresh token for `user_id`.
pub async fn issue(pool: &SqlitePool, user_id: i64) -> sqlx::Result<String> {
    let token = generate();
    sqlx::query("INSERT INTO api_tokens (user_id, name, token, created_at) VALUES (?, ?, ?, ?)")
        .bind(user_id)
        .bind(TOKEN_NAME)
        .bind(&token)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(token)
}

/// Delete the given token; other sessions of the same user stay valid.
pub async fn revoke(pool: &SqlitePool, token: &str) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM api_tokens WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Resolve a presented token to its user, if any.
pub async fn authenticate(pool: &SqlitePool, token: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as(
        "SELECT u.* FROM users u
         JOIN api_tokens t ON t.user_id = u.id
         WHERE t.token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_40_hex_chars_and_unique() {
        let a = generate();
        let b = generate();
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
