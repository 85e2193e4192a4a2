use common::config::Config;
use std::sync::Arc;

/// Shared application state.
///
/// Read-only: handlers keep no tokens or sessions between requests.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
