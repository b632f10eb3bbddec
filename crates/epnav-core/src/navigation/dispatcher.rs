//! Navigation dispatcher implementation

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, info};

use super::{ClickZones, NavigationSubscriber, ZoneAction};
use crate::address::{derive_address, Direction, NavigationTarget};
use crate::gesture::GestureAccumulator;
use crate::state::ReaderContext;

/// Result of asking the dispatcher to leave the current document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The host was asked to navigate
    Navigated(NavigationTarget),
    /// A navigation was already issued this session; nothing was done
    AlreadyNavigated(NavigationTarget),
    /// No neighbouring episode (first episode, or no parseable address)
    NoTarget,
    /// The input did not call for a navigation
    Ignored,
}

impl CommitOutcome {
    pub fn navigated(&self) -> Option<&NavigationTarget> {
        match self {
            CommitOutcome::Navigated(target) => Some(target),
            _ => None,
        }
    }
}

/// Session state stored internally
#[derive(Debug, Default)]
struct SessionState {
    issued: Option<NavigationTarget>,
}

/// Turns commit decisions into cross-document navigations
pub struct NavigationDispatcher {
    context: ReaderContext,
    gesture: Arc<GestureAccumulator>,
    zones: ClickZones,
    session: RwLock<SessionState>,
    subscribers: RwLock<Vec<Weak<dyn NavigationSubscriber>>>,
}

impl NavigationDispatcher {
    pub fn new(context: ReaderContext, gesture: Arc<GestureAccumulator>) -> Self {
        let zones = ClickZones::new(&context.config.click);
        Self {
            context,
            gesture,
            zones,
            session: RwLock::new(SessionState::default()),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub fn zones(&self) -> &ClickZones {
        &self.zones
    }

    /// Target issued during the current session, if any
    pub fn issued(&self) -> Option<NavigationTarget> {
        self.session.read().issued.clone()
    }

    /// Forget the issued navigation; called when a new document opens
    pub fn begin_session(&self) {
        self.session.write().issued = None;
    }

    /// Navigate one episode in `direction`.
    ///
    /// At most one navigation is issued per session; repeated commits while
    /// the host is leaving the document are suppressed.
    pub fn commit(&self, direction: Direction) -> CommitOutcome {
        self.gesture.reset();

        if let Some(issued) = self.issued() {
            debug!(?direction, target = %issued, "navigation already issued this session");
            return CommitOutcome::AlreadyNavigated(issued);
        }

        let Some(current) = self.context.current_address() else {
            debug!(?direction, "no episode address in location");
            return CommitOutcome::NoTarget;
        };
        let Some(target) = derive_address(&current, direction) else {
            debug!(?direction, current = %current, "no neighbouring episode");
            return CommitOutcome::NoTarget;
        };

        self.session.write().issued = Some(target.clone());
        info!(from = %current, step = direction.step(), url = %target.url(), "navigating to episode");
        self.context.navigator.navigate(&target);
        self.notify_subscribers(&target);
        CommitOutcome::Navigated(target)
    }

    /// Key-down: the advance key leaves from the last unit, the retreat key
    /// from the first unit.
    pub fn handle_key(&self, key: &str) -> CommitOutcome {
        let keys = &self.context.config.keys;
        let direction = if key == keys.advance {
            Direction::Forward
        } else if key == keys.retreat {
            Direction::Backward
        } else {
            return CommitOutcome::Ignored;
        };

        if self.context.boundary().admits(direction) {
            self.commit(direction)
        } else {
            CommitOutcome::Ignored
        }
    }

    /// Click at viewport-relative `x`: edge zones leave the document when
    /// the matching boundary is in view.
    pub fn handle_click(&self, x: f64) -> CommitOutcome {
        let Some(width) = self.context.host.viewport_width() else {
            return CommitOutcome::Ignored;
        };
        let direction = match self.zones.classify(x, width) {
            Some(ZoneAction::Advance) => Direction::Forward,
            Some(ZoneAction::Retreat) => Direction::Backward,
            None => return CommitOutcome::Ignored,
        };

        if self.context.boundary().admits(direction) {
            self.commit(direction)
        } else {
            CommitOutcome::Ignored
        }
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn NavigationSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    /// Notify all subscribers of an issued navigation
    fn notify_subscribers(&self, target: &NavigationTarget) {
        let live: Vec<Arc<dyn NavigationSubscriber>> = {
            let mut subscribers = self.subscribers.write();

            // Remove any dead weak references
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for subscriber in live {
            subscriber.on_navigation(target);
        }
    }
}
