use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::db::models::User;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

use super::decode_body;

const MIN_PASSWORD_LENGTH: usize = 8;

// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Incorrect email or password.";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::bad_request("Email cannot be empty"));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        return Err(ApiError::bad_request("Invalid email format"));
    }

    Ok(())
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.len() < 3 {
        return Err(ApiError::bad_request("Username must be at least 3 characters"));
    }

    if username.len() > 50 {
        return Err(ApiError::bad_request("Username must be less than 50 characters"));
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(ApiError::bad_request(
            "Username can only contain letters, numbers, underscore, and hyphen",
        ));
    }

    if !username.chars().next().is_some_and(|c| c.is_alphanumeric()) {
        return Err(ApiError::bad_request("Username must start with a letter or number"));
    }

    Ok(())
}

fn issue_token(user: &User) -> Result<String, ApiError> {
    let claims = Claims::new(user.id, user.email.clone());
    Ok(auth::generate_jwt(claims)?)
}

/// POST /api/users/register - create an account and issue a token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let req: RegisterRequest = decode_body(payload)?;

    let email = req.email.trim().to_lowercase();
    validate_email(&email)?;
    validate_username(&req.username)?;

    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let salt = auth::generate_salt();
    let hash = auth::hash_password(&req.password, &salt);

    let user = User::insert(&state.pool, &email, &req.username, &hash, &salt)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return ApiError::conflict("An account with that email already exists.");
                }
            }
            ApiError::from(e)
        })?;

    let token = issue_token(&user)?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user, "token": token }))))
}

/// POST /api/users/login - verify credentials and issue a token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let req: LoginRequest = decode_body(payload)?;
    let email = req.email.trim().to_lowercase();

    let user = User::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    if !auth::verify_password(&req.password, &user.password_salt, &user.password_hash) {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = issue_token(&user)?;
    Ok(Json(json!({ "user": user, "token": token })))
}

/// GET /api/users/me - the authenticated caller's stored record
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>, ApiError> {
    let record = User::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists."))?;

    Ok(Json(record))
}
