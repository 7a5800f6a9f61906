use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{InMemoryRevocationStore, RevocationStore, TokenService};
use crate::db;

/// Shared handles threaded through every request. The revocation store is
/// injected so deployments can swap the in-memory set for a shared one.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenService,
    pub revocations: Arc<dyn RevocationStore>,
}

impl AppState {
    pub fn from_env() -> Self {
        Self {
            pool: db::connect_pool(),
            tokens: TokenService::from_config(),
            revocations: Arc::new(InMemoryRevocationStore::new()),
        }
    }
}
