//! Input abstraction layer.

mod router;

pub use router::InputRouter;

use crate::gesture::WheelSample;

/// A surface the host delivers input events from.
///
/// Content documents are recreated per navigable unit, so item surfaces
/// come and go over a session while the top-level surface stays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SurfaceId {
    /// The top-level viewing surface
    Main,
    /// A materialized content document, by item index
    Item(usize),
}

/// Raw input events consumed by the router.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Key-down with the host's key name (`ArrowLeft`, ...)
    Key { key: String },
    /// Passive wheel event
    Wheel(WheelSample),
    /// Click with its x coordinate relative to the originating surface
    Click { client_x: f64 },
}

impl InputEvent {
    pub fn key(key: impl Into<String>) -> Self {
        InputEvent::Key { key: key.into() }
    }
}
