//! Reading history for the episode navigation engine
//!
//! A bounded, most-recently-used list of visited series, persisted as JSON
//! under a single storage key.

pub mod entry;
pub mod log;
pub mod recorder;
pub mod store;

use thiserror::Error;

// Re-exports
pub use entry::HistoryEntry;
pub use log::HistoryLog;
pub use recorder::PersistentHistory;
pub use store::{FileStore, HistoryStore, MemoryStore};

/// Errors that can occur in history operations
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}
