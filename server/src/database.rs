//! SQLite connection pool and schema management.
//!
//! The schema is created on startup with `CREATE TABLE IF NOT EXISTS`, so a
//! fresh database file (or an in-memory database in tests) is usable without
//! a separate migration step. Foreign keys are switched on for every
//! connection so that deleting a user, note, or tag cascades as the schema
//! declares.

use std::str::FromStr;

use anyhow::Context as _;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open a pool for `url` (e.g. `sqlite:daybook.db` or `sqlite::memory:`) and
/// make sure the schema exists.
pub async fn connect(url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .context("invalid database url")?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives and dies with its connection, so it must
    // not be spread across a pool.
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("failed to open database")?;

    init_database(&pool).await?;

    Ok(pool)
}

/// Create the tables if they don't exist.
async fn init_database(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )
    .execute(pool)
    .await
    .context("failed to create users table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS api_tokens (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            token TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );",
    )
    .execute(pool)
    .await
    .context("failed to create api_tokens table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            is_completed INTEGER NOT NULL DEFAULT 0,
            due_date TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )
    .execute(pool)
    .await
    .context("failed to create tasks table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )
    .execute(pool)
    .await
    .context("failed to create notes table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )
    .execute(pool)
    .await
    .context("failed to create tags table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS note_tag (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            note_id INTEGER NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (note_id, tag_id)
        );",
    )
    .execute(pool)
    .await
    .context("failed to create note_tag table")?;

    Ok(())
}
