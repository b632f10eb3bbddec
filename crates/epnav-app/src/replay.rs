//! Drive the engine through a recorded session on a virtual clock

use std::sync::Arc;
use std::time::Duration;

use epnav_core::mock::MockHost;
use epnav_core::{
    CommitOutcome, HistoryRecorder, InputEvent, InputRouter, ManualScheduler, NavConfig, NavigationSubscriber,
    NavigationTarget, Navigator, ReaderContext, ReaderPosition, ReaderSignal, SignalBus, SurfaceId, WheelSample,
};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::script::{surface, ScriptAction, SessionScript};

/// A navigation issued during replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayNavigation {
    pub at: Duration,
    pub target: NavigationTarget,
}

/// Navigator standing in for the browser: it moves the host to the document
/// the server would redirect to.
struct ReplayNavigator {
    host: Arc<MockHost>,
}

impl Navigator for ReplayNavigator {
    fn navigate(&self, target: &NavigationTarget) {
        self.host.set_query(Some(target.address.reader_location()));
        self.host.set_fragment(target.edge.map(|edge| edge.fragment().to_string()));
    }
}

/// Observes navigations issued by the dispatcher, stamped with virtual time
struct NavigationLog {
    scheduler: Arc<ManualScheduler>,
    issued: Mutex<Vec<ReplayNavigation>>,
}

impl NavigationSubscriber for NavigationLog {
    fn on_navigation(&self, target: &NavigationTarget) {
        let at = self.scheduler.now();
        info!(at_ms = at.as_millis() as u64, url = %target.url(), "navigate");
        self.issued.lock().push(ReplayNavigation {
            at,
            target: target.clone(),
        });
    }
}

/// Outcome of a replay
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub navigations: Vec<ReplayNavigation>,
    /// Units the host was asked to focus, e.g. on edge-hinted arrival
    pub focused: Vec<usize>,
    /// Inputs that produced a commit attempt but no navigation
    pub suppressed: usize,
}

/// Replay `script`, recording opened episodes into `history` when given.
pub fn replay(
    script: &SessionScript,
    config: NavConfig,
    history: Option<Arc<dyn HistoryRecorder>>,
) -> ReplayReport {
    let host = Arc::new(MockHost::new(script.location.clone()));
    host.set_fragment(script.fragment.clone());
    host.set_title(script.title.clone());
    host.set_viewport_width(Some(script.viewport_width));
    host.set_position(Some(ReaderPosition::paged(script.units, script.start_view.iter().copied())));

    let scheduler = Arc::new(ManualScheduler::new());
    let navigator = Arc::new(ReplayNavigator {
        host: Arc::clone(&host),
    });
    let log = Arc::new(NavigationLog {
        scheduler: Arc::clone(&scheduler),
        issued: Mutex::new(Vec::new()),
    });

    let settle = config.gesture.decay_window().max(config.arrival.scroll_delay());
    let mut context = ReaderContext::new(host.clone(), navigator.clone(), scheduler.clone(), config);
    if let Some(history) = history {
        context = context.with_history(history);
    }

    let router = InputRouter::new(context);
    router.dispatcher().add_subscriber(log.clone());
    let bus = SignalBus::new();
    router.attach(&bus);

    let mut suppressed = 0;
    for step in &script.events {
        scheduler.advance_to(Duration::from_millis(step.at_ms));
        debug!(at_ms = step.at_ms, action = ?step.action, "replay step");

        let outcome = match &step.action {
            ScriptAction::Open { items } => {
                // A new document starts at its first unit
                host.set_position(Some(ReaderPosition::paged(script.units, [0])));
                bus.publish(ReaderSignal::ContentOpened {
                    items: items.iter().copied().map(SurfaceId::Item).collect(),
                });
                None
            }
            ScriptAction::ItemReady { item } => {
                bus.publish(ReaderSignal::ItemReady {
                    surface: SurfaceId::Item(*item),
                });
                None
            }
            ScriptAction::View { units } => {
                host.set_position(Some(ReaderPosition::paged(script.units, units.iter().copied())));
                None
            }
            ScriptAction::Key { key, item } => Some(router.dispatch(surface(*item), &InputEvent::key(key.clone()))),
            ScriptAction::Wheel { delta_x, delta_y, item } => Some(router.dispatch(
                surface(*item),
                &InputEvent::Wheel(WheelSample {
                    delta_x: *delta_x,
                    delta_y: *delta_y,
                }),
            )),
            ScriptAction::Click { x, item } => {
                Some(router.dispatch(surface(*item), &InputEvent::Click { client_x: *x }))
            }
        };

        if matches!(outcome, Some(CommitOutcome::NoTarget | CommitOutcome::AlreadyNavigated(_))) {
            suppressed += 1;
        }
    }

    // Let pending decay and arrival timers run out
    scheduler.advance(settle);

    let navigations = log.issued.lock().clone();
    ReplayReport {
        navigations,
        focused: host.focused(),
        suppressed,
    }
}
