use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::load_and_authorize;
use crate::db::models::Project;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

use super::{decode_body, parse_id};

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

fn validate_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request("name must be a non-empty string"));
    }
    Ok(trimmed)
}

/// GET /api/project - all projects for the logged-in user
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = Project::list_for_owner(&state.pool, user.id).await?;
    Ok(Json(projects))
}

/// GET /api/project/:id - one project, if the caller owns it
pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&id)?;
    let project = load_and_authorize::<Project>(&state.pool, id, user.id, "see").await?;
    Ok(Json(project))
}

/// POST /api/project - create a project owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let req: CreateProjectRequest = decode_body(payload)?;
    let name = validate_name(&req.name)?;

    let project =
        Project::insert(&state.pool, user.id, name, req.description.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/project/:id - partial update of an owned project
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&id)?;
    let req: UpdateProjectRequest = decode_body(payload)?;
    let name = req.name.as_deref().map(validate_name).transpose()?;

    load_and_authorize::<Project>(&state.pool, id, user.id, "update").await?;

    let updated =
        Project::update_owned(&state.pool, id, user.id, name, req.description.as_deref()).await?;

    updated
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No project found with this id."))
}

/// DELETE /api/project/:id - delete an owned project (tasks cascade at the
/// schema layer)
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;

    load_and_authorize::<Project>(&state.pool, id, user.id, "delete").await?;

    let deleted = Project::delete_owned(&state.pool, id, user.id).await?;
    if !deleted {
        return Err(ApiError::not_found("No project found with this id."));
    }

    Ok(Json(json!({ "message": "Project deleted." })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(validate_name("  ").unwrap_err().status_code(), 400);
        assert_eq!(validate_name(" side project ").unwrap(), "side project");
    }

    #[test]
    fn create_request_ignores_owner_in_payload() {
        let req: CreateProjectRequest = decode_body(json!({
            "name": "Relaunch",
            "owner": "22222222-2222-2222-2222-222222222222"
        }))
        .unwrap();
        assert_eq!(req.name, "Relaunch");
        assert!(req.description.is_none());
    }
}
