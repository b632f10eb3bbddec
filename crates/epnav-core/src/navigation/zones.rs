//! Edge click zones of the viewing surface

use crate::config::{ClickConfig, ReadingDirection};

/// Logical meaning of a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneAction {
    Advance,
    Retreat,
}

/// Maps a horizontal click position to an advance/retreat zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickZones {
    pub edge_fraction: f64,
    pub reading_direction: ReadingDirection,
}

impl ClickZones {
    pub fn new(config: &ClickConfig) -> Self {
        Self {
            edge_fraction: config.edge_fraction,
            reading_direction: config.reading_direction,
        }
    }

    /// Classify `x` (viewport-relative) on a surface `width` wide.
    ///
    /// Returns `None` for the middle of the surface or an unusable width.
    pub fn classify(&self, x: f64, width: f64) -> Option<ZoneAction> {
        if !(width.is_finite() && width > 0.0 && x.is_finite()) {
            return None;
        }
        let zone = width * self.edge_fraction;
        let (left, right) = match self.reading_direction {
            ReadingDirection::RightToLeft => (ZoneAction::Advance, ZoneAction::Retreat),
            ReadingDirection::LeftToRight => (ZoneAction::Retreat, ZoneAction::Advance),
        };
        if x < zone {
            Some(left)
        } else if x > width - zone {
            Some(right)
        } else {
            None
        }
    }
}

impl Default for ClickZones {
    fn default() -> Self {
        Self::new(&ClickConfig::default())
    }
}
