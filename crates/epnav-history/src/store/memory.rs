use ahash::AHashMap;
use parking_lot::RwLock;

use super::HistoryStore;
use crate::HistoryError;

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<AHashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a raw value, bypassing the log
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}

impl HistoryStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, HistoryError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), HistoryError> {
        self.insert(key, value);
        Ok(())
    }
}
