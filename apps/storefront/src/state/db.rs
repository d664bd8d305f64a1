//! # Database State
//!
//! The `Database` from `drivehub-db` holds a `SqlitePool`, which is safe
//! to share between commands without extra locking.

use drivehub_db::Database;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// ```rust,ignore
    /// let cars = db_state.inner().vehicles().list(true).await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
