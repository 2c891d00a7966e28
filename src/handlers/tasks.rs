use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::db::load_and_authorize;
use crate::db::models::{Project, Task};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

use super::{decode_body, parse_id};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
}

fn validate_title(title: &str) -> Result<&str, ApiError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request("title must be a non-empty string"));
    }
    Ok(trimmed)
}

/// GET /api/project/:id/tasks - tasks of an owned project.
///
/// Ownership is transitive: the parent project is authorized first, then
/// tasks are listed scoped to it. A project with no tasks yields an empty
/// array with a success status.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let id = parse_id(&id)?;
    let project = load_and_authorize::<Project>(&state.pool, id, user.id, "access").await?;

    let tasks = Task::list_for_project(&state.pool, project.id).await?;
    Ok(Json(tasks))
}

/// POST /api/project/:id/tasks - create a task under an owned project
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let id = parse_id(&id)?;
    let project = load_and_authorize::<Project>(&state.pool, id, user.id, "access").await?;

    let req: CreateTaskRequest = decode_body(payload)?;
    let title = validate_title(&req.title)?;

    let task = Task::insert(&state.pool, project.id, title, req.description.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(task)))
}
