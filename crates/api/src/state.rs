use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::PhotoStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and everything else is
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: civic_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Blob storage for request photos.
    pub photos: Arc<PhotoStore>,
}

impl AppState {
    pub fn new(pool: civic_db::DbPool, config: ServerConfig) -> Self {
        let photos = Arc::new(PhotoStore::new(config.media_root.clone()));
        Self {
            pool,
            config: Arc::new(config),
            photos,
        }
    }
}
