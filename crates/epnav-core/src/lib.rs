//! Boundary navigation engine for episodic EPUB reading
//!
//! This crate classifies the reader's position against content edges, turns
//! key, wheel and click input into cross-document episode navigations, and
//! reports opened episodes to a history sink. The host reader is reached
//! only through the traits in [`host`].

pub mod address;
pub mod boundary;
pub mod config;
pub mod events;
pub mod gesture;
pub mod host;
pub mod input;
pub mod navigation;
pub mod state;
pub mod timer;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

// Re-export commonly used types
pub use address::{
    derive_address, parse_address, parse_read_route, parse_source_url, AddressError, Direction,
    EdgeHint, EpisodeAddress, NavigationTarget,
};
pub use boundary::{is_at_first, is_at_last, BoundaryState, ReaderPosition, UnitId};
pub use config::{ConfigError, NavConfig, ReadingDirection};
pub use events::{ReaderSignal, SignalBus, SignalKind};
pub use gesture::{GestureAccumulator, WheelSample};
pub use host::{HistoryRecorder, Navigator, ReaderHost};
pub use input::{InputEvent, InputRouter, SurfaceId};
pub use navigation::{CommitOutcome, NavigationDispatcher, NavigationSubscriber};
pub use state::ReaderContext;
pub use timer::{ManualScheduler, Scheduler, TimerHandle};
