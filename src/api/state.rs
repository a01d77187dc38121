use std::sync::Arc;

use crate::config::Config;
use crate::db::SpendingStore;

/// Shared application state
///
/// Cloned into every handler; the store and configuration are shared, never copied.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SpendingStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn SpendingStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
