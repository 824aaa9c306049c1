//! Trailing-edge throttling on top of a [`Scheduler`].
//!
//! The first [`Throttle::push`] arms a one-shot timer; pushes that arrive
//! before it fires replace the pending payload without re-arming. When the
//! timer fires, [`Throttle::on_timer`] hands back the latest payload. Key
//! repeat therefore produces at most one notification per interval, and the
//! last keystroke is never lost.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use horizon_datefield_core::{ManualClock, SharedTimerManager, Throttle};
//!
//! let clock = Arc::new(ManualClock::new());
//! let timers = Arc::new(SharedTimerManager::with_clock(clock.clone()));
//! let mut throttle = Throttle::new(timers.clone(), Duration::from_millis(100));
//!
//! throttle.push("a");
//! throttle.push("b");
//! clock.advance(Duration::from_millis(100));
//!
//! let fired = timers.process_expired();
//! assert_eq!(throttle.on_timer(fired[0]), Some("b"));
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::logging::targets;
use crate::timer::{Scheduler, TimerId};

/// Default throttle interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Coalesces payloads and releases the latest one on the trailing edge.
pub struct Throttle<T> {
    scheduler: Arc<dyn Scheduler>,
    interval: Duration,
    timer: Option<TimerId>,
    payload: Option<T>,
}

impl<T> Throttle<T> {
    /// Create a throttle with the given interval.
    pub fn new(scheduler: Arc<dyn Scheduler>, interval: Duration) -> Self {
        Self {
            scheduler,
            interval,
            timer: None,
            payload: None,
        }
    }

    /// Get the throttle interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Check whether a payload is waiting for the trailing edge.
    pub fn is_pending(&self) -> bool {
        self.payload.is_some()
    }

    /// The timer currently armed, if any.
    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Store `payload` as the latest value, arming the timer if idle.
    pub fn push(&mut self, payload: T) {
        self.payload = Some(payload);
        if self.timer.is_none() {
            let id = self.scheduler.start_one_shot(self.interval);
            tracing::trace!(target: targets::THROTTLE, ?id, interval = ?self.interval, "throttle armed");
            self.timer = Some(id);
        }
    }

    /// Handle a fired timer. Returns the latest payload if `id` is ours.
    pub fn on_timer(&mut self, id: TimerId) -> Option<T> {
        if self.timer != Some(id) {
            return None;
        }
        self.timer = None;
        let payload = self.payload.take();
        tracing::trace!(target: targets::THROTTLE, ?id, released = payload.is_some(), "throttle fired");
        payload
    }

    /// Release the pending payload now, cancelling the timer.
    pub fn flush(&mut self) -> Option<T> {
        self.stop_timer();
        self.payload.take()
    }

    /// Drop the pending payload and cancel the timer.
    pub fn cancel(&mut self) {
        self.stop_timer();
        self.payload = None;
    }

    fn stop_timer(&mut self) {
        if let Some(id) = self.timer.take() {
            // The timer may already have fired and been reaped by the manager.
            let _ = self.scheduler.stop(id);
        }
    }
}

impl<T> Drop for Throttle<T> {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
