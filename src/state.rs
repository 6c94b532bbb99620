use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{KeyStore, TaskStore};

/// Shared application state injected into every handler.
///
/// The store sits behind trait objects so tests can substitute an in-memory
/// fake without touching module-level state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub keys: Arc<dyn KeyStore>,
    pub tasks: Arc<dyn TaskStore>,
}
