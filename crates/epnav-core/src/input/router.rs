use std::sync::Arc;

use ahash::AHashSet;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::{InputEvent, SurfaceId};
use crate::address::EdgeHint;
use crate::events::{ReaderSignal, SignalBus, SignalHandler, SignalKind};
use crate::gesture::GestureAccumulator;
use crate::navigation::{CommitOutcome, NavigationDispatcher};
use crate::state::ReaderContext;
use crate::timer::TimerSlot;

/// Binds host input surfaces and lifecycle signals to the engine
pub struct InputRouter {
    context: ReaderContext,
    gesture: Arc<GestureAccumulator>,
    dispatcher: Arc<NavigationDispatcher>,
    bound: Mutex<AHashSet<SurfaceId>>,
    arrival_scroll: Mutex<TimerSlot>,
}

impl InputRouter {
    /// Build the engine for one viewing session. The top-level surface is
    /// bound immediately.
    pub fn new(context: ReaderContext) -> Arc<Self> {
        let gesture = Arc::new(GestureAccumulator::new(
            Arc::clone(&context.scheduler),
            &context.config.gesture,
        ));
        let dispatcher = Arc::new(NavigationDispatcher::new(context.clone(), Arc::clone(&gesture)));

        let mut bound = AHashSet::new();
        bound.insert(SurfaceId::Main);

        Arc::new(Self {
            context,
            gesture,
            dispatcher,
            bound: Mutex::new(bound),
            arrival_scroll: Mutex::new(TimerSlot::new()),
        })
    }

    /// Subscribe to the host's lifecycle signals
    pub fn attach(self: &Arc<Self>, bus: &SignalBus) {
        bus.subscribe(SignalKind::ContentOpened, self.clone());
        bus.subscribe(SignalKind::ItemReady, self.clone());
    }

    pub fn dispatcher(&self) -> &Arc<NavigationDispatcher> {
        &self.dispatcher
    }

    pub fn gesture(&self) -> &Arc<GestureAccumulator> {
        &self.gesture
    }

    /// Start routing events from `surface`. Returns false if it was already bound.
    pub fn bind_surface(&self, surface: SurfaceId) -> bool {
        let added = self.bound.lock().insert(surface);
        if added {
            debug!(?surface, "surface bound");
        }
        added
    }

    pub fn is_bound(&self, surface: SurfaceId) -> bool {
        self.bound.lock().contains(&surface)
    }

    /// Route one input event from `surface`.
    ///
    /// Classification, accumulation and any resulting commit all happen
    /// before this returns.
    pub fn dispatch(&self, surface: SurfaceId, event: &InputEvent) -> CommitOutcome {
        if !self.is_bound(surface) {
            return CommitOutcome::Ignored;
        }
        if self.context.current_address().is_none() {
            return CommitOutcome::Ignored;
        }

        match event {
            InputEvent::Key { key } => self.dispatcher.handle_key(key),
            InputEvent::Wheel(sample) => {
                let boundary = self.context.boundary();
                match self.gesture.feed(sample.axis_delta(), boundary) {
                    Some(direction) => self.dispatcher.commit(direction),
                    None => CommitOutcome::Ignored,
                }
            }
            InputEvent::Click { client_x } => {
                let offset = self.context.host.surface_offset(surface).unwrap_or(0.0);
                self.dispatcher.handle_click(offset + client_x)
            }
        }
    }

    /// Handle a lifecycle signal
    pub fn on_signal(&self, signal: &ReaderSignal) {
        match signal {
            ReaderSignal::ItemReady { surface } => {
                self.bind_surface(*surface);
            }
            ReaderSignal::ContentOpened { items } => self.on_content_opened(items),
        }
    }

    fn on_content_opened(&self, items: &[SurfaceId]) {
        self.gesture.reset();
        self.dispatcher.begin_session();
        for item in items {
            self.bind_surface(*item);
        }

        let arrive_at_foot = self
            .context
            .host
            .location_fragment()
            .and_then(|fragment| EdgeHint::from_fragment(&fragment))
            == Some(EdgeHint::Foot);
        if arrive_at_foot {
            self.schedule_arrival_scroll();
        }

        let Some(address) = self.context.current_address() else {
            debug!("content opened without an episode address");
            return;
        };
        info!(address = %address, arrive_at_foot, "episode opened");

        if let Some(history) = &self.context.history {
            let title = self
                .context
                .host
                .publication_title()
                .filter(|title| !title.trim().is_empty());
            history.record(&address, title.as_deref());
        }
    }

    /// Scroll to the final unit once layout has settled, replacing any
    /// scroll still pending from an earlier signal.
    fn schedule_arrival_scroll(&self) {
        let scheduler = &self.context.scheduler;
        let stale = self.arrival_scroll.lock().take();
        if let Some(handle) = stale {
            scheduler.cancel(handle);
        }

        let host = Arc::clone(&self.context.host);
        let handle = scheduler.schedule(
            self.context.config.arrival.scroll_delay(),
            Box::new(move || {
                if let Some(last) = host.position().and_then(|position| position.last_unit()) {
                    debug!(unit = last, "scrolling to final unit on arrival");
                    host.focus_unit(last);
                }
            }),
        );
        self.arrival_scroll.lock().arm(scheduler.as_ref(), handle);
    }
}

impl SignalHandler for InputRouter {
    fn handle(&self, signal: &ReaderSignal) {
        self.on_signal(signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::EpisodeAddress;
    use crate::boundary::ReaderPosition;
    use crate::config::NavConfig;
    use crate::gesture::WheelSample;
    use crate::mock::{MockHost, RecordingHistory, RecordingNavigator};
    use crate::timer::ManualScheduler;
    use std::time::Duration;

    struct Fixture {
        host: Arc<MockHost>,
        navigator: Arc<RecordingNavigator>,
        history: Arc<RecordingHistory>,
        scheduler: Arc<ManualScheduler>,
        router: Arc<InputRouter>,
        bus: SignalBus,
    }

    fn fixture(query: &str) -> Fixture {
        let host = Arc::new(MockHost::new(query));
        host.set_position(Some(ReaderPosition::paged(8, [7])));
        host.set_viewport_width(Some(800.0));
        let navigator = Arc::new(RecordingNavigator::default());
        let history = Arc::new(RecordingHistory::default());
        let scheduler = Arc::new(ManualScheduler::new());
        let context = ReaderContext::new(host.clone(), navigator.clone(), scheduler.clone(), NavConfig::default())
            .with_history(history.clone());
        let router = InputRouter::new(context);
        let bus = SignalBus::new();
        router.attach(&bus);
        Fixture { host, navigator, history, scheduler, router, bus }
    }

    #[test]
    fn test_wheel_gesture_navigates_forward() {
        let f = fixture("?book=narou/abc_3.epub");
        let main = SurfaceId::Main;
        assert_eq!(f.router.dispatch(main, &InputEvent::Wheel(WheelSample::vertical(60.0))), CommitOutcome::Ignored);
        f.scheduler.advance(Duration::from_millis(300));
        let outcome = f.router.dispatch(main, &InputEvent::Wheel(WheelSample::vertical(55.0)));
        assert_eq!(outcome.navigated().map(|t| t.url()), Some("/read/abc/4".to_string()));
        assert_eq!(f.navigator.urls(), vec!["/read/abc/4"]);
        assert_eq!(f.router.gesture().magnitude(), 0.0);
    }

    #[test]
    fn test_unbound_item_surface_is_ignored_until_ready() {
        let f = fixture("?book=narou/abc_3.epub");
        let item = SurfaceId::Item(7);
        assert!(!f.router.is_bound(item));
        assert_eq!(f.router.dispatch(item, &InputEvent::key("ArrowLeft")), CommitOutcome::Ignored);

        f.bus.publish(ReaderSignal::ItemReady { surface: item });
        assert!(f.router.is_bound(item));
        assert!(f.router.dispatch(item, &InputEvent::key("ArrowLeft")).navigated().is_some());
    }

    #[test]
    fn test_click_offset_converted_to_viewport() {
        let f = fixture("?book=narou/abc_3.epub");
        let item = SurfaceId::Item(1);
        f.host.set_surface_offset(item, 400.0);
        f.bus.publish(ReaderSignal::ContentOpened { items: vec![item] });

        // 400 + 100 lands in the middle of an 800 wide surface
        assert_eq!(f.router.dispatch(item, &InputEvent::Click { client_x: 100.0 }), CommitOutcome::Ignored);
        // The main surface has no offset: 100 is inside the left zone
        assert!(f
            .router
            .dispatch(SurfaceId::Main, &InputEvent::Click { client_x: 100.0 })
            .navigated()
            .is_some());
    }

    #[test]
    fn test_content_opened_records_history() {
        let f = fixture("?book=narou/abc_3.epub");
        f.host.set_title(Some("My Novel".to_string()));
        f.bus.publish(ReaderSignal::ContentOpened { items: vec![SurfaceId::Item(0)] });

        assert_eq!(
            f.history.records(),
            vec![(EpisodeAddress::new("abc", 3), Some("My Novel".to_string()))]
        );
        assert!(f.router.is_bound(SurfaceId::Item(0)));
        assert!(f.host.focused().is_empty());
        assert_eq!(f.scheduler.pending(), 0);
    }

    #[test]
    fn test_content_opened_without_address_skips_history() {
        let f = fixture("?book=narou/manual.epub");
        f.bus.publish(ReaderSignal::ContentOpened { items: vec![] });
        assert!(f.history.records().is_empty());
        assert_eq!(f.router.dispatch(SurfaceId::Main, &InputEvent::key("ArrowLeft")), CommitOutcome::Ignored);
    }

    #[test]
    fn test_edge_hint_scrolls_to_final_unit_after_delay() {
        let f = fixture("?book=narou/abc_2.epub");
        f.host.set_fragment(Some("#bibi(edge=foot)".to_string()));
        f.host.set_position(Some(ReaderPosition::paged(8, [0])));
        f.bus.publish(ReaderSignal::ContentOpened { items: vec![] });

        f.scheduler.advance(Duration::from_millis(99));
        assert!(f.host.focused().is_empty());
        f.scheduler.advance(Duration::from_millis(1));
        assert_eq!(f.host.focused(), vec![7]);
    }

    #[test]
    fn test_second_open_replaces_pending_scroll() {
        let f = fixture("?book=narou/abc_2.epub");
        f.host.set_fragment(Some("#bibi(edge=foot)".to_string()));
        f.bus.publish(ReaderSignal::ContentOpened { items: vec![] });
        f.scheduler.advance(Duration::from_millis(50));
        f.bus.publish(ReaderSignal::ContentOpened { items: vec![] });
        assert_eq!(f.scheduler.pending(), 1);

        f.scheduler.advance(Duration::from_millis(500));
        assert_eq!(f.host.focused(), vec![7]);
    }

    #[test]
    fn test_content_opened_starts_new_session() {
        let f = fixture("?book=narou/abc_3.epub");
        assert!(f.router.dispatch(SurfaceId::Main, &InputEvent::key("ArrowLeft")).navigated().is_some());
        assert!(matches!(
            f.router.dispatch(SurfaceId::Main, &InputEvent::key("ArrowLeft")),
            CommitOutcome::AlreadyNavigated(_)
        ));

        f.router.dispatch(SurfaceId::Main, &InputEvent::Wheel(WheelSample::vertical(40.0)));
        f.bus.publish(ReaderSignal::ContentOpened { items: vec![] });
        assert_eq!(f.router.gesture().magnitude(), 0.0);
        assert!(f.router.dispatch(SurfaceId::Main, &InputEvent::key("ArrowLeft")).navigated().is_some());
        assert_eq!(f.navigator.urls().len(), 2);
    }
}
