use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::ownership::Owned;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Project {
    const TABLE: &'static str = "projects";
    const RESOURCE: &'static str = "project";

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl Project {
    pub async fn list_for_owner(pool: &PgPool, owner: Uuid) -> Result<Vec<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE owner_id = $1 ORDER BY created_at",
        )
        .bind(owner)
        .fetch_all(pool)
        .await
    }

    pub async fn insert(
        pool: &PgPool,
        owner: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (name, description, owner_id)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(name)
        .bind(description)
        .bind(owner)
        .fetch_one(pool)
        .await
    }

    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        owner: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects
             SET name = COALESCE($3, name),
                 description = COALESCE($4, description),
                 updated_at = now()
             WHERE id = $1 AND owner_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .bind(description)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete_owned(pool: &PgPool, id: Uuid, owner: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
