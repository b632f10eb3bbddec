//! Cancellable deferred callbacks
//!
//! The engine never relies on implicit timer replacement: anything that
//! re-arms a timer cancels the previous handle first.

use std::time::Duration;

mod manual;

pub use manual::ManualScheduler;

/// Handle identifying one scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub(crate) u64);

impl TimerHandle {
    /// Wrap a scheduler-assigned timer id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Callback run when a timer fires
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Host-provided deferred execution
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle;

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    fn cancel(&self, handle: TimerHandle) -> bool;
}

/// A single re-armable timer
#[derive(Debug, Default)]
pub struct TimerSlot {
    handle: Option<TimerHandle>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending handle, leaving the slot empty
    pub fn take(&mut self) -> Option<TimerHandle> {
        self.handle.take()
    }

    /// Store a freshly scheduled handle, cancelling any handle still held
    pub fn arm(&mut self, scheduler: &dyn Scheduler, handle: TimerHandle) {
        if let Some(displaced) = self.handle.replace(handle) {
            scheduler.cancel(displaced);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}
