//! A single history record

use chrono::{DateTime, Utc};
use epnav_core::EpisodeAddress;
use serde::{Deserialize, Serialize};

/// Last visit to one series.
///
/// Serialized with the field names the bookshelf page reads
/// (`novel_id`, `novel_title`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Series identifier, unique within a log
    #[serde(rename = "novel_id", alias = "series_id")]
    pub series_id: String,

    /// Display title, falling back to the series id
    #[serde(rename = "novel_title", alias = "title")]
    pub title: String,

    /// Episode opened most recently
    pub last_episode: u32,

    /// When that episode was opened
    pub last_accessed: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(address: &EpisodeAddress, title: Option<&str>, at: DateTime<Utc>) -> Self {
        Self {
            series_id: address.series_id.clone(),
            title: title.unwrap_or(&address.series_id).to_string(),
            last_episode: address.episode,
            last_accessed: at,
        }
    }

    /// Address of the episode to resume from
    pub fn resume_address(&self) -> EpisodeAddress {
        EpisodeAddress::new(self.series_id.clone(), self.last_episode)
    }
}
