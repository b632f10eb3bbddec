//! Engine driven by a scheduler implemented outside the crate

use std::sync::Arc;
use std::time::Duration;

use epnav_core::config::GestureConfig;
use epnav_core::timer::TimerTask;
use epnav_core::{
    BoundaryState, GestureAccumulator, InputRouter, NavConfig, NavigationTarget, Navigator, ReaderContext,
    ReaderHost, ReaderPosition, ReaderSignal, Scheduler, SignalBus, SurfaceId, TimerHandle, UnitId,
};
use parking_lot::Mutex;

/// Queue of deferred tasks flushed by the test, standing in for an event loop
#[derive(Default)]
struct HostScheduler {
    next_id: Mutex<u64>,
    queue: Mutex<Vec<(TimerHandle, Duration, TimerTask)>>,
}

impl HostScheduler {
    fn pending(&self) -> Vec<(u64, Duration)> {
        self.queue.lock().iter().map(|(handle, delay, _)| (handle.id(), *delay)).collect()
    }

    fn run_all(&self) {
        let tasks: Vec<_> = self.queue.lock().drain(..).collect();
        for (_, _, task) in tasks {
            task();
        }
    }
}

impl Scheduler for HostScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let mut next_id = self.next_id.lock();
        *next_id += 1;
        let handle = TimerHandle::new(*next_id);
        self.queue.lock().push((handle, delay, task));
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let mut queue = self.queue.lock();
        let before = queue.len();
        queue.retain(|(queued, _, _)| *queued != handle);
        queue.len() != before
    }
}

struct PagedHost {
    fragment: Option<String>,
    position: Mutex<ReaderPosition>,
    focused: Mutex<Vec<UnitId>>,
}

impl ReaderHost for PagedHost {
    fn location_query(&self) -> Option<String> {
        Some("?book=narou/abc_2.epub".to_string())
    }

    fn location_fragment(&self) -> Option<String> {
        self.fragment.clone()
    }

    fn position(&self) -> Option<ReaderPosition> {
        Some(self.position.lock().clone())
    }

    fn focus_unit(&self, unit: UnitId) {
        self.focused.lock().push(unit);
    }

    fn viewport_width(&self) -> Option<f64> {
        Some(1000.0)
    }
}

struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _target: &NavigationTarget) {}
}

#[test]
fn test_gesture_decay_runs_on_host_scheduler() {
    let scheduler = Arc::new(HostScheduler::default());
    let gesture = GestureAccumulator::new(scheduler.clone(), &GestureConfig::default());
    let at_last = BoundaryState { at_first: false, at_last: true };

    assert_eq!(gesture.feed(40.0, at_last), None);
    assert_eq!(scheduler.pending(), vec![(1, Duration::from_millis(800))]);

    // Re-arming cancels the first decay timer through the host
    assert_eq!(gesture.feed(30.0, at_last), None);
    assert_eq!(scheduler.pending(), vec![(2, Duration::from_millis(800))]);
    assert_eq!(gesture.magnitude(), 70.0);

    scheduler.run_all();
    assert_eq!(gesture.magnitude(), 0.0);
    assert!(!gesture.has_pending_reset());
}

#[test]
fn test_arrival_scroll_runs_on_host_scheduler() {
    let scheduler = Arc::new(HostScheduler::default());
    let host = Arc::new(PagedHost {
        fragment: Some("#bibi(edge=foot)".to_string()),
        position: Mutex::new(ReaderPosition::paged(5, [0])),
        focused: Mutex::new(Vec::new()),
    });
    let context = ReaderContext::new(host.clone(), Arc::new(NoopNavigator), scheduler.clone(), NavConfig::default());
    let router = InputRouter::new(context);
    let bus = SignalBus::new();
    router.attach(&bus);

    bus.publish(ReaderSignal::ContentOpened { items: vec![SurfaceId::Item(0)] });
    bus.publish(ReaderSignal::ContentOpened { items: vec![SurfaceId::Item(0)] });
    assert_eq!(scheduler.pending().len(), 1);
    assert_eq!(scheduler.pending()[0].1, Duration::from_millis(100));

    scheduler.run_all();
    assert_eq!(*host.focused.lock(), vec![4]);
}
