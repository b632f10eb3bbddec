//! One JSON file per key under a directory

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::HistoryStore;
use crate::HistoryError;

/// Store keeping each key in `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Keys are restricted to `[A-Za-z0-9_.-]` and may
    /// not start with a dot.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, HistoryError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(HistoryError::Store(format!("invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl HistoryStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, HistoryError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), HistoryError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Replace atomically so a crash never leaves a half-written log
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "history written");
        Ok(())
    }
}
