use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::ownership::Owned;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Note {
    const TABLE: &'static str = "notes";
    const RESOURCE: &'static str = "note";

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl Note {
    /// All notes belonging to one user, in insertion order.
    pub async fn list_for_owner(pool: &PgPool, owner: Uuid) -> Result<Vec<Note>, sqlx::Error> {
        sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE owner_id = $1 ORDER BY created_at",
        )
        .bind(owner)
        .fetch_all(pool)
        .await
    }

    /// The owner always comes from the authenticated caller, never the payload.
    pub async fn insert(
        pool: &PgPool,
        owner: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Note, sqlx::Error> {
        sqlx::query_as::<_, Note>(
            "INSERT INTO notes (title, content, owner_id)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(title)
        .bind(content)
        .bind(owner)
        .fetch_one(pool)
        .await
    }

    /// Partial field replacement, filtered by {id, owner} at write time.
    /// owner_id is immutable after creation and is never part of the SET list.
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        owner: Uuid,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Option<Note>, sqlx::Error> {
        sqlx::query_as::<_, Note>(
            "UPDATE notes
             SET title = COALESCE($3, title),
                 content = COALESCE($4, content),
                 updated_at = now()
             WHERE id = $1 AND owner_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(title)
        .bind(content)
        .fetch_optional(pool)
        .await
    }

    /// Conditional delete filtered by {id, owner}. Returns whether a row matched.
    pub async fn delete_owned(pool: &PgPool, id: Uuid, owner: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
