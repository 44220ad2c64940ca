//! Shared state handed to every route handler.

use stockbook_db::Database;

/// Application state. Cheap to clone; the pool is reference counted.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
