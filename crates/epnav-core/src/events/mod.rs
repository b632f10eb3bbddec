use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::trace;

use crate::input::SurfaceId;

/// Lifecycle signals the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// The whole publication finished loading
    ContentOpened,
    /// One content document became available
    ItemReady,
}

impl SignalKind {
    pub fn name(&self) -> &'static str {
        match self {
            SignalKind::ContentOpened => "content-opened",
            SignalKind::ItemReady => "item-ready",
        }
    }
}

/// Lifecycle signal published by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderSignal {
    /// Publication opened; `items` are the content surfaces materialized so far
    ContentOpened { items: Vec<SurfaceId> },
    /// A content surface was (re)created
    ItemReady { surface: SurfaceId },
}

impl ReaderSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            ReaderSignal::ContentOpened { .. } => SignalKind::ContentOpened,
            ReaderSignal::ItemReady { .. } => SignalKind::ItemReady,
        }
    }
}

/// Handler trait for signal subscribers
pub trait SignalHandler: Send + Sync {
    fn handle(&self, signal: &ReaderSignal);
}

/// Typed publish/subscribe bus for reader lifecycle signals
pub struct SignalBus {
    handlers: Mutex<AHashMap<SignalKind, Vec<Arc<dyn SignalHandler>>>>,
}

impl SignalBus {
    /// Create a new signal bus
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(AHashMap::new()),
        }
    }

    /// Subscribe to one kind of signal
    pub fn subscribe(&self, kind: SignalKind, handler: Arc<dyn SignalHandler>) {
        self.handlers.lock().entry(kind).or_default().push(handler);
    }

    /// Publish a signal to every handler of its kind, in subscription order.
    ///
    /// Handlers run without the bus lock held, so they may publish or
    /// subscribe themselves.
    pub fn publish(&self, signal: ReaderSignal) {
        let kind = signal.kind();
        let handlers: Vec<Arc<dyn SignalHandler>> =
            self.handlers.lock().get(&kind).cloned().unwrap_or_default();

        trace!(signal = kind.name(), handlers = handlers.len(), "publishing signal");
        for handler in handlers {
            handler.handle(&signal);
        }
    }

    pub fn handler_count(&self, kind: SignalKind) -> usize {
        self.handlers.lock().get(&kind).map_or(0, Vec::len)
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating signal handlers from closures
pub struct ClosureSignalHandler<F> {
    handler: F,
}

impl<F> SignalHandler for ClosureSignalHandler<F>
where
    F: Fn(&ReaderSignal) + Send + Sync,
{
    fn handle(&self, signal: &ReaderSignal) {
        (self.handler)(signal);
    }
}

/// Create a signal handler from a closure
pub fn handler_from_fn<F>(f: F) -> Arc<dyn SignalHandler>
where
    F: Fn(&ReaderSignal) + Send + Sync + 'static,
{
    Arc::new(ClosureSignalHandler { handler: f })
}
