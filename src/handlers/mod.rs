pub mod notes;
pub mod projects;
pub mod tasks;
pub mod users;

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;

/// Route ids arrive as raw path segments; anything that is not a UUID is a
/// client error, not a store error.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid id ({}).", raw)))
}

/// Decode a JSON body into a typed request, mapping malformed payloads to 400.
/// Unknown fields (an owner supplied by the caller, for instance) are dropped.
pub(crate) fn decode_body<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
}
