//! Durable key/value storage for the history log

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::HistoryError;

/// String storage addressed by key, in the manner of browser local storage
pub trait HistoryStore: Send + Sync {
    /// Read the value under `key`; `Ok(None)` when nothing was stored
    fn read(&self, key: &str) -> Result<Option<String>, HistoryError>;

    /// Replace the value under `key`
    fn write(&self, key: &str, value: &str) -> Result<(), HistoryError>;
}
