use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::load_and_authorize;
use crate::db::models::Note;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

use super::{decode_body, parse_id};

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

fn validate_title(title: &str) -> Result<&str, ApiError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request("title must be a non-empty string"));
    }
    Ok(trimmed)
}

/// GET /api/notes - all notes for the logged-in user
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = Note::list_for_owner(&state.pool, user.id).await?;
    Ok(Json(notes))
}

/// GET /api/notes/:id - one note, if the caller owns it
pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_id(&id)?;
    let note = load_and_authorize::<Note>(&state.pool, id, user.id, "see").await?;
    Ok(Json(note))
}

/// POST /api/notes - create a note owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let req: CreateNoteRequest = decode_body(payload)?;
    let title = validate_title(&req.title)?;

    let note = Note::insert(&state.pool, user.id, title, &req.content).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/notes/:id - partial update of an owned note
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_id(&id)?;
    let req: UpdateNoteRequest = decode_body(payload)?;
    let title = req.title.as_deref().map(validate_title).transpose()?;

    load_and_authorize::<Note>(&state.pool, id, user.id, "update").await?;

    // The write itself is filtered by {id, owner}; if ownership changed
    // between the read and this statement, the filter is authoritative.
    let updated =
        Note::update_owned(&state.pool, id, user.id, title, req.content.as_deref()).await?;

    updated
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No note found with this id."))
}

/// DELETE /api/notes/:id - delete an owned note
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;

    load_and_authorize::<Note>(&state.pool, id, user.id, "delete").await?;

    let deleted = Note::delete_owned(&state.pool, id, user.id).await?;
    if !deleted {
        return Err(ApiError::not_found("No note found with this id."));
    }

    Ok(Json(json!({ "message": "Note deleted." })))
}
