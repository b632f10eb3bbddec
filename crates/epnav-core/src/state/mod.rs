use std::sync::Arc;

use crate::address::{parse_address, EpisodeAddress};
use crate::boundary::BoundaryState;
use crate::config::NavConfig;
use crate::host::{HistoryRecorder, Navigator, ReaderHost};
use crate::timer::Scheduler;

/// Everything a viewing session needs from its surroundings.
///
/// Passed to each component at construction instead of reaching for
/// ambient reader state.
#[derive(Clone)]
pub struct ReaderContext {
    /// Host reader read primitives
    pub host: Arc<dyn ReaderHost>,

    /// Full-document navigation
    pub navigator: Arc<dyn Navigator>,

    /// Deferred execution for decay and arrival timers
    pub scheduler: Arc<dyn Scheduler>,

    /// Reading history sink, if history is enabled
    pub history: Option<Arc<dyn HistoryRecorder>>,

    /// Engine settings
    pub config: Arc<NavConfig>,
}

impl ReaderContext {
    pub fn new(
        host: Arc<dyn ReaderHost>,
        navigator: Arc<dyn Navigator>,
        scheduler: Arc<dyn Scheduler>,
        config: NavConfig,
    ) -> Self {
        Self {
            host,
            navigator,
            scheduler,
            history: None,
            config: Arc::new(config),
        }
    }

    pub fn with_history(mut self, history: Arc<dyn HistoryRecorder>) -> Self {
        self.history = Some(history);
        self
    }

    /// Episode address of the current location, if it encodes one
    pub fn current_address(&self) -> Option<EpisodeAddress> {
        self.host.location_query().and_then(|query| parse_address(&query))
    }

    /// Boundary state of the current view
    pub fn boundary(&self) -> BoundaryState {
        BoundaryState::classify(self.host.position().as_ref())
    }
}
