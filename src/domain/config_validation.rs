//! Configuration validation.
//!
//! Checks every journal setting before a store is opened.

use crate::domain::config::StorageBackend;
use crate::domain::error::JournalError;
use crate::ports::config_port::ConfigPort;

pub fn validate_journal_config(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_starting_balance(config)?;
    validate_backend(config)?;
    validate_storage_path(config)?;
    Ok(())
}

fn validate_starting_balance(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let Some(raw) = config.get_string("journal", "starting_balance") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(()),
        _ => Err(JournalError::ConfigInvalid {
            section: "journal".to_string(),
            key: "starting_balance".to_string(),
            reason: "starting_balance must be a positive number".to_string(),
        }),
    }
}

fn validate_backend(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let Some(raw) = config.get_string("storage", "backend") else {
        return Ok(());
    };
    match StorageBackend::from_label(&raw) {
        Some(StorageBackend::Sqlite) if !cfg!(feature = "sqlite") => Err(JournalError::ConfigInvalid {
            section: "storage".to_string(),
            key: "backend".to_string(),
            reason: "sqlite backend not compiled in (enable the 'sqlite' feature)".to_string(),
        }),
        Some(_) => Ok(()),
        None => Err(JournalError::ConfigInvalid {
            section: "storage".to_string(),
            key: "backend".to_string(),
            reason: format!("unknown backend '{}', expected file or sqlite", raw.trim()),
        }),
    }
}

fn validate_storage_path(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("storage", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(JournalError::ConfigMissing {
            section: "storage".to_string(),
            key: "path".to_string(),
        }),
    }
}
