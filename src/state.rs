use crate::config::Config;
use crate::gateway::Gateway;
use crate::storage::Storage;
use std::sync::Arc;

/// Shared by every request; holds no mutable data, the JSON files are the state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Storage,
    pub gateway: Arc<dyn Gateway>,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn Gateway>) -> Self {
        let storage = Storage::new(config.data_dir.clone());
        Self {
            config: Arc::new(config),
            storage,
            gateway,
        }
    }
}
