//! Application state.

use std::sync::Arc;

use task_store::TaskStore;

use crate::config::Config;
use crate::services::{TaskService, UserService};

/// Shared application state.
pub struct AppState<S: TaskStore> {
    /// Server configuration.
    pub config: Config,
    /// User management service.
    pub users: UserService<S>,
    /// Task management service.
    pub tasks: TaskService<S>,
}

impl<S: TaskStore> AppState<S> {
    /// Creates new application state, injecting the store into the
    /// services.
    pub fn new(config: Config, store: S) -> Self {
        let store = Arc::new(store);
        Self {
            config,
            users: UserService::new(store.clone()),
            tasks: TaskService::new(store),
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config and store.
pub fn create_shared_state<S: TaskStore>(config: Config, store: S) -> SharedState<S> {
    Arc::new(AppState::new(config, store))
}
