//! Admin-only nested listings: any user's notes or tasks.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::models::{Note, Tag, Task, User};
use crate::pagination::{self, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    page: Option<String>,
}

pub async fn notes(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let user = find_user(&state.pool, user_id).await?;
    let page = pagination::parse_page(params.page.as_deref());

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE user_id = ?")
        .bind(user.id)
        .fetch_one(&state.pool)
        .await?;

    let notes: Vec<Note> =
        sqlx::query_as("SELECT * FROM notes WHERE user_id = ? ORDER BY id LIMIT ? OFFSET ?")
            .bind(user.id)
            .bind(pagination::PER_PAGE)
            .bind(pagination::offset(page))
            .fetch_all(&state.pool)
            .await?;

    let ids: Vec<i64> = notes.iter().map(|n| n.id).collect();
    let by_note = Tag::for_notes(&state.pool, &ids).await?;
    let infos: Vec<_> = notes
        .iter()
        .map(|note| note.to_info(by_note.get(&note.id).map(Vec::as_slice).unwrap_or(&[])))
        .collect();

    Ok(Json(json!({
        "message": format!("Notes of user {} loaded successfully", user.name),
        "user": user.to_info(),
        "data": Page::new(infos, page, total),
    })))
}

pub async fn tasks(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let user = find_user(&state.pool, user_id).await?;
    let page = pagination::parse_page(params.page.as_deref());

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE user_id = ?")
        .bind(user.id)
        .fetch_one(&state.pool)
        .await?;

    let tasks: Vec<Task> =
        sqlx::query_as("SELECT * FROM tasks WHERE user_id = ? ORDER BY id LIMIT ? OFFSET ?")
            .bind(user.id)
            .bind(pagination::PER_PAGE)
            .bind(pagination::offset(page))
            .fetch_all(&state.pool)
            .await?;

    let infos: Vec<_> = tasks.iter().map(Task::to_info).collect();

    Ok(Json(json!({
        "message": format!("Tasks of user {} loaded successfully", user.name),
        "user": user.to_info(),
        "data": Page::new(infos, page, total),
    })))
}

async fn find_user(pool: &SqlitePool, id: i64) -> Result<User, ApiError> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}
