use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;

use crate::services::municipalities::MunicipalityDirectory;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub municipalities: MunicipalityDirectory,
}

impl AppState {
    /// Never hold the returned guard across an await point.
    pub fn db(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
