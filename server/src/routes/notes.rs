//! Owner-scoped note CRUD, including tag synchronization and the tag/search
//! list filters.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::models::{Note, NoteInfo, Tag};
use crate::pagination::{self, Page};
use crate::state::AppState;
use crate::validation::{extract, rules, ValidationErrors};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    tag: Option<String>,
    search: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let page = pagination::parse_page(params.page.as_deref());
    let tag = params.tag.as_deref().filter(|t| !t.is_empty());
    let search = params.search.as_deref().filter(|s| !s.is_empty());

    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM notes WHERE user_id = ");
    count.push_bind(current.user.id);
    push_filters(&mut count, tag, search);
    let total: i64 = count.build_query_scalar().fetch_one(&state.pool).await?;

    let mut query = QueryBuilder::new("SELECT * FROM notes WHERE user_id = ");
    query.push_bind(current.user.id);
    push_filters(&mut query, tag, search);
    query.push(" ORDER BY id LIMIT ");
    query.push_bind(pagination::PER_PAGE);
    query.push(" OFFSET ");
    query.push_bind(pagination::offset(page));
    let notes: Vec<Note> = query.build_query_as().fetch_all(&state.pool).await?;

    let data = Page::new(with_tags(&state.pool, &notes).await?, page, total);

    Ok(Json(json!({
        "message": "Notes loaded successfully",
        "data": data,
    })))
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, tag: Option<&str>, search: Option<&str>) {
    if let Some(tag) = tag {
        query.push(
            " AND id IN (SELECT nt.note_id FROM note_tag nt \
             JOIN tags t ON t.id = nt.tag_id WHERE t.name = ",
        );
        query.push_bind(tag.to_string());
        query.push(")");
    }
    if let Some(search) = search {
        query.push(" AND title LIKE ");
        query.push_bind(format!("%{search}%"));
    }
}

/// Attach tags to a page of notes with a single pivot query.
async fn with_tags(pool: &SqlitePool, notes: &[Note]) -> Result<Vec<NoteInfo>, ApiError> {
    let ids: Vec<i64> = notes.iter().map(|n| n.id).collect();
    let by_note = Tag::for_notes(pool, &ids).await?;

    Ok(notes
        .iter()
        .map(|note| note.to_info(by_note.get(&note.id).map(Vec::as_slice).unwrap_or(&[])))
        .collect())
}

pub async fn store(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut errors = ValidationErrors::default();
    rules::require_string(&body, "title", &mut errors);
    rules::max_chars(&body, "title", 255, &mut errors);
    rules::require_string(&body, "content", &mut errors);
    rules::optional_string_array(&body, "tags", 255, &mut errors);
    errors.into_result()?;

    let title = extract::string(&body, "title").unwrap_or_default();
    let content = extract::string(&body, "content").unwrap_or_default();
    let now = Utc::now();

    let note: Note = sqlx::query_as(
        "INSERT INTO notes (user_id, title, content, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(current.user.id)
    .bind(&title)
    .bind(&content)
    .bind(now)
    .bind(now)
    .fetch_one(&state.pool)
    .await?;

    if let Some(names) = extract::string_array(&body, "tags") {
        note.sync_tags(&state.pool, &names).await?;
    }

    let tags = Tag::for_note(&state.pool, note.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Note created successfully",
            "data": note.to_info(&tags),
        })),
    ))
}

pub async fn show(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let note = find_note(&state.pool, current.user.id, id).await?;
    let tags = Tag::for_note(&state.pool, note.id).await?;

    Ok(Json(json!({ "data": note.to_info(&tags) })))
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let note = find_note(&state.pool, current.user.id, id).await?;

    let mut errors = ValidationErrors::default();
    rules::optional_string(&body, "title", &mut errors);
    rules::max_chars(&body, "title", 255, &mut errors);
    rules::optional_string(&body, "content", &mut errors);
    rules::optional_string_array(&body, "tags", 255, &mut errors);
    errors.into_result()?;

    let title = extract::string(&body, "title").unwrap_or_else(|| note.title.clone());
    let content = extract::string(&body, "content").unwrap_or_else(|| note.content.clone());

    let note: Note = sqlx::query_as(
        "UPDATE notes SET title = ?, content = ?, updated_at = ?
         WHERE id = ?
         RETURNING *",
    )
    .bind(&title)
    .bind(&content)
    .bind(Utc::now())
    .bind(note.id)
    .fetch_one(&state.pool)
    .await?;

    // Re-sync the pivot whenever the key is present; an empty array clears
    // every tag from the note.
    if let Some(names) = extract::string_array(&body, "tags") {
        note.sync_tags(&state.pool, &names).await?;
    }

    let tags = Tag::for_note(&state.pool, note.id).await?;

    Ok(Json(json!({
        "message": "Note updated successfully",
        "data": note.to_info(&tags),
    })))
}

pub async fn destroy(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let note = find_note(&state.pool, current.user.id, id).await?;

    // Pivot rows go with the note via ON DELETE CASCADE.
    sqlx::query("DELETE FROM notes WHERE id = ?")
        .bind(note.id)
        .execute(&state.pool)
        .await?;

    Ok(Json(json!({ "message": "Note deleted successfully" })))
}

async fn find_note(pool: &SqlitePool, user_id: i64, id: i64) -> Result<Note, ApiError> {
    sqlx::query_as("SELECT * FROM notes WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".into()))
}
