use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::config;

/// Errors surfaced by the store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the application pool. Connections are established lazily so the
/// process can start (and the router can be exercised) before the database
/// is reachable.
pub fn connect_pool() -> PgPool {
    let cfg = &config::config().database;
    PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_lazy(&cfg.url)
        .expect("invalid DATABASE_URL")
}

pub async fn health_check(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
