//! Traits implemented by the host reader
//!
//! Every read accessor is optional: a host that has not finished loading
//! answers `None` and the engine treats that as "no boundary", "no title"
//! and so on.

use crate::address::{EpisodeAddress, NavigationTarget};
use crate::boundary::{ReaderPosition, UnitId};
use crate::input::SurfaceId;

/// Read primitives and the focus action exposed by the host reader
pub trait ReaderHost: Send + Sync {
    /// Query part of the current location, e.g. `?book=narou/abc_3.epub`
    fn location_query(&self) -> Option<String>;

    /// Fragment part of the current location
    fn location_fragment(&self) -> Option<String>;

    /// Current pagination snapshot
    fn position(&self) -> Option<ReaderPosition>;

    /// Scroll or focus the given unit immediately
    fn focus_unit(&self, unit: UnitId);

    /// Width of the top-level viewing surface
    fn viewport_width(&self) -> Option<f64>;

    /// Horizontal offset of a surface within the viewing surface
    fn surface_offset(&self, surface: SurfaceId) -> Option<f64> {
        match surface {
            SurfaceId::Main => Some(0.0),
            SurfaceId::Item(_) => None,
        }
    }

    /// Title from the publication metadata
    fn publication_title(&self) -> Option<String> {
        None
    }
}

/// Full-document navigation performed by the host
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &NavigationTarget);
}

/// Sink for visited episodes, implemented by the history crate
pub trait HistoryRecorder: Send + Sync {
    /// Record a visit. `title` is the publication title if the host had one.
    fn record(&self, address: &EpisodeAddress, title: Option<&str>);
}
