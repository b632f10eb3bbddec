//! Engine configuration
//!
//! Every field has a default matching the reader extension's behaviour, so an
//! empty JSON object is a valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Physical layout of the reading order, used to map click zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingDirection {
    /// Vertical Japanese text: the left edge advances, the right edge retreats
    RightToLeft,
    /// Horizontal western text: the right edge advances, the left edge retreats
    LeftToRight,
}

/// Wheel hysteresis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Accumulated magnitude that must be exceeded to commit
    pub commit_threshold: f64,
    /// Idle time after which accumulated magnitude is forgotten
    pub decay_window_ms: u64,
}

impl GestureConfig {
    pub fn decay_window(&self) -> Duration {
        Duration::from_millis(self.decay_window_ms)
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            commit_threshold: 100.0,
            decay_window_ms: 800,
        }
    }
}

/// Click zone settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickConfig {
    /// Width of each edge zone as a fraction of the viewing surface
    pub edge_fraction: f64,
    pub reading_direction: ReadingDirection,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            edge_fraction: 0.25,
            reading_direction: ReadingDirection::RightToLeft,
        }
    }
}

/// Key names as reported by the host's key-down events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub advance: String,
    pub retreat: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            advance: "ArrowLeft".to_string(),
            retreat: "ArrowRight".to_string(),
        }
    }
}

/// Behaviour when a document finishes opening
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalConfig {
    /// Layout settling delay before scrolling to the final unit
    pub scroll_delay_ms: u64,
}

impl ArrivalConfig {
    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self { scroll_delay_ms: 100 }
    }
}

/// Reading history persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    pub storage_key: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            storage_key: "nepub_reading_history".to_string(),
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub gesture: GestureConfig,
    pub click: ClickConfig,
    pub keys: KeyConfig,
    pub arrival: ArrivalConfig,
    pub history: HistoryConfig,
}

impl NavConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: NavConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gesture.commit_threshold.is_finite() && self.gesture.commit_threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "commit_threshold must be positive, got {}",
                self.gesture.commit_threshold
            )));
        }
        if !(self.click.edge_fraction > 0.0 && self.click.edge_fraction <= 0.5) {
            return Err(ConfigError::Invalid(format!(
                "edge_fraction must be in (0, 0.5], got {}",
                self.click.edge_fraction
            )));
        }
        let keys = &self.keys;
        if keys.advance.is_empty() || keys.retreat.is_empty() || keys.advance == keys.retreat {
            return Err(ConfigError::Invalid(
                "advance and retreat keys must be distinct and non-empty".to_string(),
            ));
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid("history capacity must be at least 1".to_string()));
        }
        if self.history.storage_key.is_empty() {
            return Err(ConfigError::Invalid("history storage_key must not be empty".to_string()));
        }
        Ok(())
    }
}
