use std::sync::Arc;
use std::time::Duration;

use epnav_core::mock::{MockHost, RecordingNavigator};
use epnav_core::{
    CommitOutcome, InputEvent, InputRouter, ManualScheduler, NavConfig, ReaderContext, ReaderPosition,
    ReaderSignal, SignalBus, SurfaceId, WheelSample,
};
use epnav_history::{FileStore, HistoryLog, HistoryStore, PersistentHistory};

struct Session {
    host: Arc<MockHost>,
    navigator: Arc<RecordingNavigator>,
    scheduler: Arc<ManualScheduler>,
    router: Arc<InputRouter>,
    bus: SignalBus,
}

fn open_session(query: &str, fragment: Option<&str>, store: Arc<dyn HistoryStore>) -> Session {
    let host = Arc::new(MockHost::new(query));
    host.set_fragment(fragment.map(str::to_string));
    host.set_position(Some(ReaderPosition::paged(6, [0])));
    host.set_viewport_width(Some(1200.0));
    host.set_title(Some("Test Novel".to_string()));

    let config = NavConfig::default();
    let history = Arc::new(PersistentHistory::from_config(store, &config.history));
    let navigator = Arc::new(RecordingNavigator::default());
    let scheduler = Arc::new(ManualScheduler::new());
    let context = ReaderContext::new(host.clone(), navigator.clone(), scheduler.clone(), config)
        .with_history(history);

    let router = InputRouter::new(context);
    let bus = SignalBus::new();
    router.attach(&bus);
    bus.publish(ReaderSignal::ContentOpened { items: vec![SurfaceId::Item(0)] });

    Session { host, navigator, scheduler, router, bus }
}

#[test]
fn wheel_past_last_unit_navigates_and_history_follows() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn HistoryStore> = Arc::new(FileStore::new(dir.path()));

    let session = open_session("?book=narou/abc_3.epub", None, store.clone());
    session.host.set_position(Some(ReaderPosition::paged(6, [5])));

    let item = SurfaceId::Item(0);
    let wheel = |delta| InputEvent::Wheel(WheelSample::vertical(delta));
    assert_eq!(session.router.dispatch(item, &wheel(60.0)), CommitOutcome::Ignored);
    session.scheduler.advance(Duration::from_millis(400));
    let outcome = session.router.dispatch(item, &wheel(55.0));
    assert_eq!(outcome.navigated().map(|t| t.url()), Some("/read/abc/4".to_string()));
    assert_eq!(session.navigator.urls(), vec!["/read/abc/4"]);

    // The next document is a fresh session reading the same store
    let next = open_session("?book=narou/abc_4.epub", None, store.clone());
    assert!(next.navigator.urls().is_empty());

    let log = HistoryLog::load(store.as_ref(), "nepub_reading_history", 50);
    assert_eq!(log.len(), 1);
    assert_eq!(log.entries()[0].last_episode, 4);
    assert_eq!(log.entries()[0].title, "Test Novel");
}

#[test]
fn retreat_arrives_at_final_unit_of_previous_episode() {
    let store: Arc<dyn HistoryStore> = Arc::new(epnav_history::MemoryStore::new());

    let session = open_session("?book=narou/abc_3.epub", None, store.clone());
    let outcome = session.router.dispatch(SurfaceId::Main, &InputEvent::key("ArrowRight"));
    let target = outcome.navigated().cloned().unwrap();
    assert_eq!(target.url(), "/read/abc/2#bibi(edge=foot)");

    let previous = open_session("?book=narou/abc_2.epub", Some("#bibi(edge=foot)"), store);
    assert!(previous.host.focused().is_empty());
    previous.scheduler.advance(Duration::from_millis(100));
    assert_eq!(previous.host.focused(), vec![5]);

    // Now at the last unit: the advance key goes forward again
    let outcome = previous.router.dispatch(SurfaceId::Main, &InputEvent::key("ArrowLeft"));
    assert_eq!(outcome.navigated().map(|t| t.url()), Some("/read/abc/3".to_string()));
}

#[test]
fn first_episode_never_navigates_backward() {
    let store: Arc<dyn HistoryStore> = Arc::new(epnav_history::MemoryStore::new());
    let session = open_session("?book=narou/abc_1.epub", None, store);

    let wheel = InputEvent::Wheel(WheelSample::vertical(-150.0));
    assert_eq!(session.router.dispatch(SurfaceId::Main, &wheel), CommitOutcome::NoTarget);
    assert_eq!(
        session.router.dispatch(SurfaceId::Item(0), &InputEvent::Click { client_x: 1100.0 }),
        CommitOutcome::NoTarget
    );
    assert!(session.navigator.urls().is_empty());
}

#[test]
fn late_item_surfaces_are_bound_on_ready() {
    let store: Arc<dyn HistoryStore> = Arc::new(epnav_history::MemoryStore::new());
    let session = open_session("?book=narou/abc_3.epub", None, store);
    session.host.set_position(Some(ReaderPosition::paged(6, [5])));

    let late = SurfaceId::Item(5);
    assert_eq!(session.router.dispatch(late, &InputEvent::key("ArrowLeft")), CommitOutcome::Ignored);
    session.bus.publish(ReaderSignal::ItemReady { surface: late });
    assert!(session.router.dispatch(late, &InputEvent::key("ArrowLeft")).navigated().is_some());
}
