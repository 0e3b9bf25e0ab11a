//! # User model
//!
//! Two representations of an account:
//!
//! - [`User`] — the complete database row from the `users` table, including
//!   the Argon2 `password_hash`. It derives [`sqlx::FromRow`] so it can be
//!   loaded directly from queries. Never serialized.
//! - [`UserInfo`] — the client-safe subset returned from the API. It omits
//!   the password hash; [`User::to_info`] performs the projection.
//!
//! `role` is either `"user"` or `"admin"`; new registrations always start as
//! `"user"` and promotion happens out of band.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const ROLE_ADMIN: &str = "admin";

/// Full user record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
