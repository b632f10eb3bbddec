//! Bounded most-recently-used history log

use chrono::{DateTime, Utc};
use epnav_core::EpisodeAddress;
use tracing::warn;

use crate::entry::HistoryEntry;
use crate::store::HistoryStore;
use crate::HistoryError;

/// Visited series, most recent first, at most one entry per series id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl HistoryLog {
    /// Default number of series kept
    pub const DEFAULT_CAPACITY: usize = 50;

    /// Create an empty log. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Build a log from stored entries, keeping the first entry seen for
    /// each series and dropping anything beyond capacity.
    pub fn with_entries(entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        for entry in entries {
            if log.entries.len() == log.capacity {
                break;
            }
            if log.position(&entry.series_id).is_none() {
                log.entries.push(entry);
            }
        }
        log
    }

    pub fn from_json(json: &str, capacity: usize) -> Result<Self, HistoryError> {
        let entries: Vec<HistoryEntry> = serde_json::from_str(json)?;
        Ok(Self::with_entries(entries, capacity))
    }

    pub fn to_json(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Read the log stored under `key`.
    ///
    /// An absent, unreadable or corrupt log yields an empty one.
    pub fn load(store: &dyn HistoryStore, key: &str, capacity: usize) -> Self {
        match store.read(key) {
            Ok(Some(json)) => Self::from_json(&json, capacity).unwrap_or_else(|error| {
                warn!(key, %error, "stored reading history is corrupt, starting empty");
                Self::new(capacity)
            }),
            Ok(None) => Self::new(capacity),
            Err(error) => {
                warn!(key, %error, "failed to read reading history, starting empty");
                Self::new(capacity)
            }
        }
    }

    pub fn save(&self, store: &dyn HistoryStore, key: &str) -> Result<(), HistoryError> {
        store.write(key, &self.to_json()?)
    }

    /// Record a visit now
    pub fn record(&mut self, address: &EpisodeAddress, title: Option<&str>) -> &HistoryEntry {
        self.record_at(address, title, Utc::now())
    }

    /// Record a visit at `at`: the series moves to the front with the new
    /// episode, and the oldest series beyond capacity are evicted.
    pub fn record_at(
        &mut self,
        address: &EpisodeAddress,
        title: Option<&str>,
        at: DateTime<Utc>,
    ) -> &HistoryEntry {
        if let Some(index) = self.position(&address.series_id) {
            self.entries.remove(index);
        }
        self.entries.insert(0, HistoryEntry::new(address, title, at));
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, series_id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.series_id == series_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn position(&self, series_id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.series_id == series_id)
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
