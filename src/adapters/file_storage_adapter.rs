//! Directory-backed key/value storage: one `<key>.json` file per key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::error::JournalError;
use crate::ports::storage_port::StoragePort;

pub struct FileStorageAdapter {
    dir: PathBuf,
}

impl FileStorageAdapter {
    /// Use `dir`, creating it if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, JournalError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, JournalError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(JournalError::Storage {
                key: key.to_string(),
                reason: "key must be alphanumeric, '_' or '-'".to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StoragePort for FileStorageAdapter {
    fn load(&self, key: &str) -> Result<Option<String>, JournalError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(JournalError::Storage {
                key: key.to_string(),
                reason: format!("failed to read {}: {}", path.display(), e),
            }),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), JournalError> {
        let path = self.key_path(key)?;
        // Write to a sibling temp file and rename so readers never see a torn value.
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value)
            .and_then(|()| fs::rename(&temp_path, &path))
            .map_err(|e| JournalError::Storage {
                key: key.to_string(),
                reason: format!("failed to write {}: {}", path.display(), e),
            })?;
        debug!(key, path = %path.display(), bytes = value.len(), "saved");
        Ok(())
    }
}
