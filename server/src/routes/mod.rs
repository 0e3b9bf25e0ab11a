//! Route table for the `/api` surface.

pub mod activity;
pub mod auth;
pub mod notes;
pub mod tasks;
pub mod users;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        // auth
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        // public passthrough
        .route("/api/random-activity", get(activity::random_activity))
        // owner-scoped resources
        .route("/api/tasks", get(tasks::index).post(tasks::store))
        .route(
            "/api/tasks/{id}",
            get(tasks::show).put(tasks::update).delete(tasks::destroy),
        )
        .route("/api/notes", get(notes::index).post(notes::store))
        .route(
            "/api/notes/{id}",
            get(notes::show).put(notes::update).delete(notes::destroy),
        )
        // admin-only nested listings
        .route("/api/users/{id}/notes", get(users::notes))
        .route("/api/users/{id}/tasks", get(users::tasks))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
