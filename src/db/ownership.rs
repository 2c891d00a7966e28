//! The load-and-authorize operation shared by every owned-resource route.
//!
//! Each route used to re-derive the same three-step check (fetch, existence,
//! owner comparison); it lives here once, parameterized by the record type.

use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use crate::error::ApiError;

/// A record owned directly by a single user.
pub trait Owned {
    /// Table the records live in.
    const TABLE: &'static str;

    /// Resource name as it appears in client-facing messages ("note", "project").
    const RESOURCE: &'static str;

    fn owner_id(&self) -> Uuid;
}

/// Existence and ownership checks over an already-fetched record.
///
/// Absent record maps to NotFound; a record owned by someone else maps to
/// Forbidden. The distinction leaks existence to the caller deliberately.
pub fn authorize<T: Owned>(
    record: Option<T>,
    id: Uuid,
    caller: Uuid,
    action: &str,
) -> Result<T, ApiError> {
    let record = record
        .ok_or_else(|| ApiError::not_found(format!("No {} found for id ({}).", T::RESOURCE, id)))?;

    if record.owner_id() != caller {
        return Err(ApiError::forbidden(format!(
            "You are not allowed to {} that {}.",
            action,
            T::RESOURCE
        )));
    }

    Ok(record)
}

/// Load a record by id and enforce ownership in one step.
pub async fn load_and_authorize<T>(
    pool: &PgPool,
    id: Uuid,
    caller: Uuid,
    action: &str,
) -> Result<T, ApiError>
where
    T: Owned + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = format!("SELECT * FROM {} WHERE id = $1", T::TABLE);
    let record = sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    authorize(record, id, caller, action)
}
