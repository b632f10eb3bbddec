//! Wheel gesture accumulation at content boundaries
//!
//! A two-state filter (idle / accumulating) with time-based decay. Small,
//! choppy wheel deltas add up as long as they keep pushing past the same
//! edge and arrive within the decay window of each other; anything else
//! drops the filter back to idle.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::address::Direction;
use crate::boundary::BoundaryState;
use crate::config::GestureConfig;
use crate::timer::{Scheduler, TimerSlot};

/// One wheel event from the host
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelSample {
    pub delta_x: f64,
    pub delta_y: f64,
}

impl WheelSample {
    pub fn vertical(delta_y: f64) -> Self {
        Self { delta_x: 0.0, delta_y }
    }

    pub fn horizontal(delta_x: f64) -> Self {
        Self { delta_x, delta_y: 0.0 }
    }

    /// Horizontal delta when present, vertical otherwise
    pub fn axis_delta(&self) -> f64 {
        if self.delta_x != 0.0 && !self.delta_x.is_nan() {
            self.delta_x
        } else {
            self.delta_y
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Accumulating { direction: Direction, magnitude: f64 },
}

impl Phase {
    fn carried(&self, direction: Direction) -> f64 {
        match *self {
            Phase::Accumulating { direction: current, magnitude } if current == direction => magnitude,
            _ => 0.0,
        }
    }
}

#[derive(Debug)]
struct AccumulatorState {
    phase: Phase,
    pending_reset: TimerSlot,
}

/// Converts a stream of wheel deltas into discrete commit decisions
pub struct GestureAccumulator {
    state: Arc<Mutex<AccumulatorState>>,
    scheduler: Arc<dyn Scheduler>,
    threshold: f64,
    decay_window: Duration,
}

impl GestureAccumulator {
    pub fn new(scheduler: Arc<dyn Scheduler>, config: &GestureConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(AccumulatorState {
                phase: Phase::Idle,
                pending_reset: TimerSlot::new(),
            })),
            scheduler,
            threshold: config.commit_threshold,
            decay_window: config.decay_window(),
        }
    }

    /// Accumulated magnitude towards the next commit
    pub fn magnitude(&self) -> f64 {
        match self.state.lock().phase {
            Phase::Idle => 0.0,
            Phase::Accumulating { magnitude, .. } => magnitude,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state.lock().phase, Phase::Idle)
    }

    pub fn has_pending_reset(&self) -> bool {
        self.state.lock().pending_reset.is_armed()
    }

    /// Drop any accumulated magnitude and cancel the decay timer
    pub fn reset(&self) {
        let stale = {
            let mut state = self.state.lock();
            state.phase = Phase::Idle;
            state.pending_reset.take()
        };
        if let Some(handle) = stale {
            self.scheduler.cancel(handle);
        }
    }

    /// Feed one wheel delta classified against the current boundary.
    ///
    /// Returns the direction to navigate when the accumulated magnitude
    /// exceeds the commit threshold. The accumulator is idle again afterwards.
    pub fn feed(&self, delta: f64, boundary: BoundaryState) -> Option<Direction> {
        let Some(direction) = boundary.qualifying_direction(delta) else {
            if !self.is_idle() {
                debug!(delta, at_first = boundary.at_first, at_last = boundary.at_last, "wheel gesture reset");
            }
            self.reset();
            return None;
        };

        let (magnitude, stale) = {
            let mut state = self.state.lock();
            let magnitude = state.phase.carried(direction) + delta.abs();
            state.phase = Phase::Accumulating { direction, magnitude };
            (magnitude, state.pending_reset.take())
        };
        if let Some(handle) = stale {
            self.scheduler.cancel(handle);
        }

        if magnitude > self.threshold {
            self.reset();
            debug!(?direction, magnitude, threshold = self.threshold, "wheel gesture committed");
            return Some(direction);
        }

        let weak = Arc::downgrade(&self.state);
        let handle = self.scheduler.schedule(
            self.decay_window,
            Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    let mut state = state.lock();
                    state.phase = Phase::Idle;
                    state.pending_reset.take();
                }
            }),
        );
        self.state.lock().pending_reset.arm(self.scheduler.as_ref(), handle);

        debug!(?direction, magnitude, "wheel gesture accumulating");
        None
    }
}
