//! Virtual-clock scheduler driven explicitly by the caller

use std::collections::BTreeMap;
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::trace;

use super::{Scheduler, TimerHandle, TimerTask};

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    /// Pending tasks ordered by (deadline, schedule order)
    pending: BTreeMap<(Duration, u64), TimerTask>,
    deadlines: AHashMap<u64, Duration>,
}

/// Scheduler whose clock only moves when told to.
///
/// Tasks run inside [`advance`](Self::advance) / [`advance_to`](Self::advance_to)
/// in deadline order, with the clock set to each task's deadline while it
/// runs. No internal lock is held while a task executes, so tasks may
/// schedule or cancel further timers.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of tasks waiting to fire
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        self.advance_to(target)
    }

    /// Move the clock to `target`, running every task due by then.
    ///
    /// Returns the number of tasks run. A target in the past is ignored.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            let task = {
                let mut state = self.state.lock();
                let due = state
                    .pending
                    .keys()
                    .next()
                    .copied()
                    .filter(|(deadline, _)| *deadline <= target);
                match due {
                    Some(key) => {
                        state.deadlines.remove(&key.1);
                        state.now = state.now.max(key.0);
                        state.pending.remove(&key)
                    }
                    None => {
                        state.now = state.now.max(target);
                        None
                    }
                }
            };

            match task {
                Some(task) => {
                    task();
                    fired += 1;
                }
                None => break,
            }
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        let deadline = state.now + delay;
        state.pending.insert((deadline, id), task);
        state.deadlines.insert(id, deadline);
        trace!(timer = id, deadline_ms = deadline.as_millis() as u64, "timer scheduled");
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let mut state = self.state.lock();
        match state.deadlines.remove(&handle.0) {
            Some(deadline) => {
                state.pending.remove(&(deadline, handle.0));
                trace!(timer = handle.0, "timer cancelled");
                true
            }
            None => false,
        }
    }
}
