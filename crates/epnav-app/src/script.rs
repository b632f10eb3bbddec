//! Recorded reader sessions
//!
//! A script describes the initial reader state and a timeline of lifecycle
//! signals, view changes and raw input events, e.g.
//!
//! ```json
//! {
//!   "location": "?book=narou/abc_3.epub",
//!   "units": 6,
//!   "events": [
//!     { "at_ms": 0,   "kind": "open", "items": [0] },
//!     { "at_ms": 10,  "kind": "view", "units": [5] },
//!     { "at_ms": 20,  "kind": "wheel", "delta_y": 60 },
//!     { "at_ms": 300, "kind": "wheel", "delta_y": 55, "item": 0 }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use epnav_core::SurfaceId;
use serde::Deserialize;

fn default_viewport_width() -> f64 {
    1000.0
}

/// Initial state plus timeline
#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    /// Location query of the first document
    pub location: String,

    /// Location fragment of the first document
    #[serde(default)]
    pub fragment: Option<String>,

    /// Publication title reported by the host
    #[serde(default)]
    pub title: Option<String>,

    /// Number of navigable units in every document
    pub units: usize,

    /// Units in view when the session starts
    #[serde(default)]
    pub start_view: Vec<usize>,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,

    pub events: Vec<ScriptStep>,
}

impl SessionScript {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading session script {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("parsing session script {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut script: SessionScript = serde_json::from_str(json)?;
        script.events.sort_by_key(|step| step.at_ms);
        Ok(script)
    }
}

/// One timeline entry
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStep {
    /// Virtual time in milliseconds since the session started
    pub at_ms: u64,

    #[serde(flatten)]
    pub action: ScriptAction,
}

/// What happens at a step
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScriptAction {
    /// The publication finished loading
    Open {
        #[serde(default)]
        items: Vec<usize>,
    },
    /// A content document was materialized
    ItemReady { item: usize },
    /// The host paginated to a new set of units
    View { units: Vec<usize> },
    Key {
        key: String,
        #[serde(default)]
        item: Option<usize>,
    },
    Wheel {
        #[serde(default)]
        delta_x: f64,
        #[serde(default)]
        delta_y: f64,
        #[serde(default)]
        item: Option<usize>,
    },
    Click {
        x: f64,
        #[serde(default)]
        item: Option<usize>,
    },
}

/// Surface an event came from; no item means the top-level surface
pub fn surface(item: Option<usize>) -> SurfaceId {
    item.map_or(SurfaceId::Main, SurfaceId::Item)
}
