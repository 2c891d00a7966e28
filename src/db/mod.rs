use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

pub mod models;
pub mod ownership;

pub use ownership::{authorize, load_and_authorize, Owned};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the connection pool from DATABASE_URL.
///
/// The pool is constructed once at startup and handed to the router through
/// application state; connectivity here gates the server ever listening.
pub async fn connect(config: &AppConfig) -> Result<PgPool, DatabaseError> {
    let dsn =
        std::env::var("DATABASE_URL").map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

    let parsed = url::Url::parse(&dsn).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&dsn)
        .await?;

    info!(
        host = parsed.host_str().unwrap_or("localhost"),
        database = parsed.path().trim_start_matches('/'),
        "connected to database"
    );
    Ok(pool)
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
