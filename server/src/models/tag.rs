use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, SqlitePool};

/// Full tag record from the database. Tag names are globally unique; notes
/// reference tags through the `note_tag` pivot.
#[derive(Debug, Clone, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    pub fn to_info(&self) -> TagInfo {
        TagInfo {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Tags attached to a single note, in tag id order.
    pub async fn for_note(pool: &SqlitePool, note_id: i64) -> sqlx::Result<Vec<Tag>> {
        sqlx::query_as(
            "SELECT t.* FROM tags t
             JOIN note_tag nt ON nt.tag_id = t.id
             WHERE nt.note_id = ?
             ORDER BY t.id",
        )
        .bind(note_id)
        .fetch_all(pool)
        .await
    }

    /// Tags for a whole page of notes in one query, keyed by note id.
    pub async fn for_notes(
        pool: &SqlitePool,
        note_ids: &[i64],
    ) -> sqlx::Result<HashMap<i64, Vec<Tag>>> {
        if note_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut qb = QueryBuilder::new(
            "SELECT nt.note_id AS note_id, t.id AS id, t.name AS name,
                    t.created_at AS created_at, t.updated_at AS updated_at
             FROM note_tag nt
             JOIN tags t ON t.id = nt.tag_id
             WHERE nt.note_id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in note_ids {
            separated.push_bind(*id);
        }
        qb.push(") ORDER BY t.id");

        let rows: Vec<NoteTagRow> = qb.build_query_as().fetch_all(pool).await?;

        let mut by_note: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in rows {
            by_note.entry(row.note_id).or_default().push(row.tag);
        }
        Ok(by_note)
    }
}

#[derive(FromRow)]
struct NoteTagRow {
    note_id: i64,
    #[sqlx(flatten)]
    tag: Tag,
}

/// Tag as returned from the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagInfo {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
