//! Resolved journal configuration.

use std::path::PathBuf;

use super::account::DEFAULT_STARTING_BALANCE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per store key inside a directory.
    #[default]
    File,
    /// A single key/value table in a SQLite database.
    Sqlite,
}

impl StorageBackend {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "file" => Some(StorageBackend::File),
            "sqlite" => Some(StorageBackend::Sqlite),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::File => "file",
            StorageBackend::Sqlite => "sqlite",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalConfig {
    pub starting_balance: f64,
    pub storage: StorageConfig,
}

impl JournalConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JournalConfig {
            starting_balance: DEFAULT_STARTING_BALANCE,
            storage: StorageConfig {
                backend: StorageBackend::default(),
                path: path.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_labels() {
        assert_eq!(StorageBackend::from_label(" SQLite "), Some(StorageBackend::Sqlite));
        assert_eq!(StorageBackend::from_label("file"), Some(StorageBackend::File));
        assert_eq!(StorageBackend::from_label("postgres"), None);
        assert_eq!(StorageBackend::Sqlite.as_str(), "sqlite");
    }

    #[test]
    fn new_uses_defaults() {
        let config = JournalConfig::new("data");
        assert_eq!(config.starting_balance, 10_000.0);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.path, PathBuf::from("data"));
    }
}
