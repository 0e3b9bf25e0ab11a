//! Owner-scoped task CRUD with completion/search filters.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::models::{Task, TaskInfo};
use crate::pagination::{self, Page};
use crate::state::AppState;
use crate::validation::{extract, rules, ValidationErrors};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    completed: Option<String>,
    search: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let page = pagination::parse_page(params.page.as_deref());
    let completed = params.completed.as_deref().map(extract::query_bool);
    let search = params.search.as_deref().filter(|s| !s.is_empty());

    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM tasks WHERE user_id = ");
    count.push_bind(current.user.id);
    push_filters(&mut count, completed, search);
    let total: i64 = count.build_query_scalar().fetch_one(&state.pool).await?;

    let mut query = QueryBuilder::new("SELECT * FROM tasks WHERE user_id = ");
    query.push_bind(current.user.id);
    push_filters(&mut query, completed, search);
    query.push(" ORDER BY id LIMIT ");
    query.push_bind(pagination::PER_PAGE);
    query.push(" OFFSET ");
    query.push_bind(pagination::offset(page));
    let tasks: Vec<Task> = query.build_query_as().fetch_all(&state.pool).await?;

    let data: Page<TaskInfo> = Page::new(tasks.iter().map(Task::to_info).collect(), page, total);

    Ok(Json(json!({
        "message": "Tasks loaded successfully",
        "data": data,
    })))
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, completed: Option<bool>, search: Option<&str>) {
    if let Some(completed) = completed {
        query.push(" AND is_completed = ");
        query.push_bind(completed);
    }
    if let Some(search) = search {
        query.push(" AND title LIKE ");
        query.push_bind(format!("%{search}%"));
    }
}

pub async fn store(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut errors = ValidationErrors::default();
    rules::require_string(&body, "title", &mut errors);
    rules::max_chars(&body, "title", 255, &mut errors);
    rules::optional_bool(&body, "is_completed", &mut errors);
    rules::optional_date(&body, "due_date", &mut errors);
    errors.into_result()?;

    let title = extract::string(&body, "title").unwrap_or_default();
    let is_completed = extract::boolean(&body, "is_completed").unwrap_or(false);
    let due_date = extract::date(&body, "due_date");
    let now = Utc::now();

    let task: Task = sqlx::query_as(
        "INSERT INTO tasks (user_id, title, is_completed, due_date, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(current.user.id)
    .bind(&title)
    .bind(is_completed)
    .bind(due_date)
    .bind(now)
    .bind(now)
    .fetch_one(&state.pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Task created successfully",
            "data": task.to_info(),
        })),
    ))
}

pub async fn show(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let task = find_task(&state.pool, current.user.id, id).await?;

    Ok(Json(json!({ "data": task.to_info() })))
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let task = find_task(&state.pool, current.user.id, id).await?;

    let mut errors = ValidationErrors::default();
    rules::optional_string(&body, "title", &mut errors);
    rules::max_chars(&body, "title", 255, &mut errors);
    rules::optional_bool(&body, "is_completed", &mut errors);
    rules::optional_date(&body, "due_date", &mut errors);
    errors.into_result()?;

    let title = extract::string(&body, "title").unwrap_or_else(|| task.title.clone());
    let is_completed = extract::boolean(&body, "is_completed").unwrap_or(task.is_completed);
    // A present-but-null due_date clears the date; an absent key keeps it.
    let due_date = if body.get("due_date").is_some() {
        extract::date(&body, "due_date")
    } else {
        task.due_date
    };

    let task: Task = sqlx::query_as(
        "UPDATE tasks SET title = ?, is_completed = ?, due_date = ?, updated_at = ?
         WHERE id = ?
         RETURNING *",
    )
    .bind(&title)
    .bind(is_completed)
    .bind(due_date)
    .bind(Utc::now())
    .bind(task.id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(json!({
        "message": "Task updated successfully",
        "data": task.to_info(),
    })))
}

pub async fn destroy(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let task = find_task(&state.pool, current.user.id, id).await?;

    sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task.id)
        .execute(&state.pool)
        .await?;

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

/// Look a task up by id within the owner's tasks only; someone else's task
/// is indistinguishable from a missing one.
async fn find_task(pool: &SqlitePool, user_id: i64, id: i64) -> Result<Task, ApiError> {
    sqlx::query_as("SELECT * FROM tasks WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))
}
