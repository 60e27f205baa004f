use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::TaskStore;

/// Shared application state, cloned per request.
///
/// The config (including the signing secret) is immutable after startup;
/// nothing here carries per-request identity — that travels exclusively in
/// request extensions.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: TaskStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: TaskStore::new(),
        }
    }
}
