//! Shared application state for the HTTP layer.
//!
//! # Responsibility
//! - Own the process-wide store connection opened at startup.
//! - Run record use-cases on the blocking pool, one at a time.
//!
//! # Invariants
//! - The connection is migrated before it is wrapped here.
//! - The mutex is held for exactly one service call.

use crate::error::ApiError;
use recordkeep_core::{RecordService, ServiceResult, SqliteRecordRepository};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Store handle injected into every handler through axum state.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` against a record service bound to the shared connection.
    pub async fn with_service<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&RecordService<SqliteRecordRepository<'_>>) -> ServiceResult<T>
            + Send
            + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| ApiError::Internal("store connection mutex poisoned".to_string()))?;
            let repo = SqliteRecordRepository::try_new(&guard)
                .map_err(|err| ApiError::Store(err.to_string()))?;
            let service = RecordService::new(repo);
            f(&service).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
    }
}
