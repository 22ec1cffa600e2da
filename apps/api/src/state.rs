use std::sync::Arc;

use crate::config::Config;
use crate::storage::Storage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Repository backend. Default: `MemStorage`.
    pub storage: Arc<dyn Storage>,
    pub config: Config,
}
