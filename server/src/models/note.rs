//! # Note model and tag synchronization
//!
//! [`Note`] is the database row; [`NoteInfo`] is the API shape and always
//! carries the note's tags, so callers pass the loaded tag list into
//! [`Note::to_info`].
//!
//! [`Note::sync_tags`] reconciles the `note_tag` pivot against a list of tag
//! names: names are trimmed, blanks dropped, each remaining name is
//! find-or-created in `tags`, and the pivot is brought to exactly that set.
//! The whole reconciliation runs in one transaction and is idempotent —
//! syncing the same set twice leaves one pivot row per tag and creates no
//! duplicate tag rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, SqlitePool};

use super::tag::{Tag, TagInfo};

/// Full note record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn to_info(&self, tags: &[Tag]) -> NoteInfo {
        NoteInfo {
            id: self.id,
            user_id: self.user_id,
            title: self.title.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            tags: tags.iter().map(Tag::to_info).collect(),
        }
    }

    /// Sync the pivot table so this note is tagged with exactly `names`.
    pub async fn sync_tags(&self, pool: &SqlitePool, names: &[String]) -> sqlx::Result<()> {
        let mut tx = pool.begin().await?;
        let now = Utc::now();

        let mut tag_ids: Vec<i64> = Vec::new();
        for raw in names {
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }

            sqlx::query(
                "INSERT INTO tags (name, created_at, updated_at) VALUES (?, ?, ?)
                 ON CONFLICT (name) DO NOTHING",
            )
            .bind(name)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            let id: i64 = sqlx::query_scalar("SELECT id FROM tags WHERE name = ?")
                .bind(name)
                .fetch_one(&mut *tx)
                .await?;

            if !tag_ids.contains(&id) {
                tag_ids.push(id);
            }
        }

        if tag_ids.is_empty() {
            sqlx::query("DELETE FROM note_tag WHERE note_id = ?")
                .bind(self.id)
                .execute(&mut *tx)
                .await?;
        } else {
            let mut qb = QueryBuilder::new("DELETE FROM note_tag WHERE note_id = ");
            qb.push_bind(self.id);
            qb.push(" AND tag_id NOT IN (");
            let mut separated = qb.separated(", ");
            for id in &tag_ids {
                separated.push_bind(*id);
            }
            qb.push(")");
            qb.build().execute(&mut *tx).await?;

            for id in &tag_ids {
                sqlx::query(
                    "INSERT INTO note_tag (note_id, tag_id, created_at, updated_at)
                     VALUES (?, ?, ?, ?)
                     ON CONFLICT (note_id, tag_id) DO NOTHING",
                )
                .bind(self.id)
                .bind(id)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await
    }
}

/// Note as returned from the API, tags included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteInfo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<TagInfo>,
}
