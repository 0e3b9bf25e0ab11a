//! # Daybook API server
//!
//! A small personal productivity backend: users register and log in with
//! bearer tokens, then manage their tasks (due dates, completion status) and
//! notes (free text plus tags), with a passthrough endpoint that fetches a
//! random activity suggestion from a public third-party API.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Password hashing (Argon2id), bearer token issue/revoke, request extractors |
//! | [`database`] | SQLite connection pool and schema creation |
//! | [`error`] | The [`error::ApiError`] type and its HTTP status mapping |
//! | [`models`] | Database rows (`FromRow`) and their client-safe projections |
//! | [`pagination`] | Offset pagination with the `current_page`/`last_page` envelope |
//! | [`routes`] | All `/api` handlers: auth, tasks, notes, admin, activity |
//! | [`settings`] | Layered configuration (defaults, `config.toml`, environment) |
//! | [`validation`] | Field-level request validation collected into 422 responses |

pub mod auth;
pub mod database;
pub mod error;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod settings;
pub mod state;
pub mod validation;

pub use routes::router;
pub use state::AppState;
