//! Durable key-value storage port.
//!
//! The journal persists three independent text blobs (trades, goals,
//! balance). Adapters only move strings; encoding is the store's concern.

use crate::domain::error::JournalError;

pub trait StoragePort {
    /// `Ok(None)` when nothing has been stored under `key` yet.
    fn load(&self, key: &str) -> Result<Option<String>, JournalError>;

    /// Overwrite whatever is stored under `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), JournalError>;
}

impl<T: StoragePort + ?Sized> StoragePort for Box<T> {
    fn load(&self, key: &str) -> Result<Option<String>, JournalError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), JournalError> {
        (**self).save(key, value)
    }
}
