//! Shared application state.

use std::sync::Arc;

use luxthrift_core::catalog::{CatalogRepository, UserDirectory};
use luxthrift_core::repository::ActivityRepository;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Durable activity store.
    pub activity_repository: Arc<dyn ActivityRepository>,
    /// Read-only product catalog.
    pub catalog: Arc<dyn CatalogRepository>,
    /// Read-only user directory.
    pub users: Arc<dyn UserDirectory>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        activity_repository: Arc<dyn ActivityRepository>,
        catalog: Arc<dyn CatalogRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            activity_repository,
            catalog,
            users,
        }
    }
}
