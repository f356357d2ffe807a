//! Application state shared across all request handlers.

use crate::config::AppConfig;
use sg_remote::RemoteClient;
use std::sync::Arc;

/// Shared, read-only application state.
pub struct AppState {
    /// Startup configuration; never mutated after construction.
    pub config: AppConfig,

    /// Client for the remote analysis server.
    pub remote: RemoteClient,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let remote = RemoteClient::new(config.remote.clone());
        Self { config, remote }
    }

    pub fn shared(config: AppConfig) -> SharedState {
        Arc::new(Self::new(config))
    }
}
