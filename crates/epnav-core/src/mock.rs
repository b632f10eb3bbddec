//! In-memory host doubles for tests and session replay.

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::address::{EpisodeAddress, NavigationTarget};
use crate::boundary::{ReaderPosition, UnitId};
use crate::host::{HistoryRecorder, Navigator, ReaderHost};
use crate::input::SurfaceId;

#[derive(Debug, Default)]
struct HostState {
    query: Option<String>,
    fragment: Option<String>,
    position: Option<ReaderPosition>,
    viewport_width: Option<f64>,
    offsets: AHashMap<SurfaceId, f64>,
    title: Option<String>,
    focused: Vec<UnitId>,
}

/// Host reader whose state is set directly by the caller
#[derive(Debug, Default)]
pub struct MockHost {
    state: Mutex<HostState>,
}

impl MockHost {
    pub fn new(query: impl Into<String>) -> Self {
        let host = Self::default();
        host.set_query(Some(query.into()));
        host
    }

    pub fn set_query(&self, query: Option<String>) {
        self.state.lock().query = query;
    }

    pub fn set_fragment(&self, fragment: Option<String>) {
        self.state.lock().fragment = fragment;
    }

    pub fn set_position(&self, position: Option<ReaderPosition>) {
        self.state.lock().position = position;
    }

    pub fn set_viewport_width(&self, width: Option<f64>) {
        self.state.lock().viewport_width = width;
    }

    pub fn set_surface_offset(&self, surface: SurfaceId, offset: f64) {
        self.state.lock().offsets.insert(surface, offset);
    }

    pub fn set_title(&self, title: Option<String>) {
        self.state.lock().title = title;
    }

    /// Units passed to `focus_unit`, oldest first
    pub fn focused(&self) -> Vec<UnitId> {
        self.state.lock().focused.clone()
    }
}

impl ReaderHost for MockHost {
    fn location_query(&self) -> Option<String> {
        self.state.lock().query.clone()
    }

    fn location_fragment(&self) -> Option<String> {
        self.state.lock().fragment.clone()
    }

    fn position(&self) -> Option<ReaderPosition> {
        self.state.lock().position.clone()
    }

    fn focus_unit(&self, unit: UnitId) {
        let mut state = self.state.lock();
        state.focused.push(unit);
        if let Some(position) = state.position.as_mut() {
            position.in_view = vec![unit];
        }
    }

    fn viewport_width(&self) -> Option<f64> {
        self.state.lock().viewport_width
    }

    fn surface_offset(&self, surface: SurfaceId) -> Option<f64> {
        let state = self.state.lock();
        match state.offsets.get(&surface) {
            Some(offset) => Some(*offset),
            None if surface == SurfaceId::Main => Some(0.0),
            None => None,
        }
    }

    fn publication_title(&self) -> Option<String> {
        self.state.lock().title.clone()
    }
}

/// Navigator that records requested targets
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    targets: Mutex<Vec<NavigationTarget>>,
}

impl RecordingNavigator {
    pub fn targets(&self) -> Vec<NavigationTarget> {
        self.targets.lock().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.targets.lock().iter().map(NavigationTarget::url).collect()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &NavigationTarget) {
        self.targets.lock().push(target.clone());
    }
}

/// History sink that records calls
#[derive(Debug, Default)]
pub struct RecordingHistory {
    records: Mutex<Vec<(EpisodeAddress, Option<String>)>>,
}

impl RecordingHistory {
    pub fn records(&self) -> Vec<(EpisodeAddress, Option<String>)> {
        self.records.lock().clone()
    }
}

impl HistoryRecorder for RecordingHistory {
    fn record(&self, address: &EpisodeAddress, title: Option<&str>) {
        self.records.lock().push((address.clone(), title.map(str::to_string)));
    }
}
