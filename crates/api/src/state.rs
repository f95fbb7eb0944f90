use std::sync::Arc;

use studio_db::PgStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used directly by the reporting and user repositories.
    pub pool: studio_db::DbPool,
    /// Store handed to the core booking and attendance services.
    pub store: PgStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: studio_db::DbPool, config: ServerConfig) -> Self {
        Self {
            store: PgStore::new(pool.clone()),
            pool,
            config: Arc::new(config),
        }
    }
}
