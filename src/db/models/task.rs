use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Tasks carry no owner of their own; access is controlled through the
/// parent project's owner.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// All tasks scoped to one project, in insertion order. An empty result
    /// is a valid, successful outcome.
    pub async fn list_for_project(pool: &PgPool, project: Uuid) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE project_id = $1 ORDER BY created_at",
        )
        .bind(project)
        .fetch_all(pool)
        .await
    }

    pub async fn insert(
        pool: &PgPool,
        project: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (project_id, title, description)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(project)
        .bind(title)
        .bind(description)
        .fetch_one(pool)
        .await
    }
}
