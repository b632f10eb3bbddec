//! Store-backed [`HistoryRecorder`]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use epnav_core::config::HistoryConfig;
use epnav_core::{EpisodeAddress, HistoryRecorder};
use tracing::{info, warn};

use crate::log::HistoryLog;
use crate::store::HistoryStore;

/// Reads, updates and writes back the stored log on every recorded visit.
///
/// Each session reads the log fresh, so successive sessions see each
/// other's writes without sharing memory.
pub struct PersistentHistory {
    store: Arc<dyn HistoryStore>,
    key: String,
    capacity: usize,
}

impl PersistentHistory {
    pub fn new(store: Arc<dyn HistoryStore>, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            store,
            key: key.into(),
            capacity,
        }
    }

    pub fn from_config(store: Arc<dyn HistoryStore>, config: &HistoryConfig) -> Self {
        Self::new(store, config.storage_key.clone(), config.capacity)
    }

    /// Current stored log (empty if absent, unreadable or corrupt)
    pub fn load(&self) -> HistoryLog {
        HistoryLog::load(self.store.as_ref(), &self.key, self.capacity)
    }

    /// Record a visit at `at` and persist it. Write failures are logged and
    /// swallowed; the updated log is returned either way.
    pub fn record_at(&self, address: &EpisodeAddress, title: Option<&str>, at: DateTime<Utc>) -> HistoryLog {
        let mut log = self.load();
        let entry = log.record_at(address, title, at);
        let (series_id, episode) = (entry.series_id.clone(), entry.last_episode);

        match log.save(self.store.as_ref(), &self.key) {
            Ok(()) => info!(series_id = %series_id, episode, entries = log.len(), "reading history saved"),
            Err(error) => warn!(series_id = %series_id, episode, %error, "failed to save reading history"),
        }
        log
    }
}

impl HistoryRecorder for PersistentHistory {
    fn record(&self, address: &EpisodeAddress, title: Option<&str>) {
        self.record_at(address, title, Utc::now());
    }
}
