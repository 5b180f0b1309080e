// Application state module
// Shared by every connection task on the local task set for the lifetime of
// the process

use std::sync::atomic::AtomicUsize;

use super::types::Config;
use crate::store::StoreProvider;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Opens a fresh storage backend per request
    pub store: Box<dyn StoreProvider>,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config, store: Box<dyn StoreProvider>) -> Self {
        Self {
            config,
            store,
            active_connections: AtomicUsize::new(0),
        }
    }
}
