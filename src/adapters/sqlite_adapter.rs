//! SQLite key/value storage adapter.

use std::path::Path;

use crate::domain::error::JournalError;
use crate::ports::storage_port::StoragePort;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, params};

pub struct SqliteStorageAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn storage_error(key: &str, e: impl std::fmt::Display) -> JournalError {
    JournalError::Storage {
        key: key.to_string(),
        reason: e.to_string(),
    }
}

impl SqliteStorageAdapter {
    /// Open (creating if needed) the database at `path` with its schema in place.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, JournalError> {
        let adapter = Self::with_manager(SqliteConnectionManager::file(path), 4)?;
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, JournalError> {
        // A pool of one keeps every caller on the same in-memory database.
        Self::with_manager(SqliteConnectionManager::memory(), 1)
    }

    fn with_manager(manager: SqliteConnectionManager, size: u32) -> Result<Self, JournalError> {
        let pool = Pool::builder()
            .max_size(size)
            .build(manager)
            .map_err(|e: r2d2::Error| storage_error("sqlite", e))?;
        Ok(Self { pool })
    }

    fn connection(&self, key: &str) -> Result<PooledConnection<SqliteConnectionManager>, JournalError> {
        self.pool
            .get()
            .map_err(|e: r2d2::Error| storage_error(key, e))
    }

    pub fn initialize_schema(&self) -> Result<(), JournalError> {
        let conn = self.connection("sqlite")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS journal_kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .map_err(|e: rusqlite::Error| storage_error("sqlite", e))?;

        Ok(())
    }
}

impl StoragePort for SqliteStorageAdapter {
    fn load(&self, key: &str) -> Result<Option<String>, JournalError> {
        let conn = self.connection(key)?;
        conn.query_row(
            "SELECT value FROM journal_kv WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e: rusqlite::Error| storage_error(key, e))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), JournalError> {
        let conn = self.connection(key)?;
        conn.execute(
            "INSERT INTO journal_kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )
        .map_err(|e: rusqlite::Error| storage_error(key, e))?;
        Ok(())
    }
}
