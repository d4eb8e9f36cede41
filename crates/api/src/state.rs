//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;

use crate::auth::AdminCredentials;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Admin login and token check.
    pub admin: Arc<AdminCredentials>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, admin: AdminCredentials) -> Self {
        Self {
            db,
            admin: Arc::new(admin),
        }
    }
}
