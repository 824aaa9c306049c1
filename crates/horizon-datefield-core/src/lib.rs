//! Core systems for Horizon Datefield.
//!
//! This crate provides the runtime pieces the date input builds on:
//!
//! - **Signals**: Type-safe notification of caller-facing events
//! - **Timers**: One-shot timers with an injectable [`Clock`]
//! - **Scheduler**: The interface timer owners hold, with cancellation
//! - **Throttle**: Trailing-edge coalescing of rapid updates
//! - **Logging**: `tracing` targets for each subsystem
//!
//! # Signal Example
//!
//! ```
//! use horizon_datefield_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_datefield_core::{Scheduler, SharedTimerManager};
//!
//! let timers = SharedTimerManager::new();
//! let id = timers.start_one_shot(Duration::from_millis(250));
//!
//! // In the host event loop:
//! for fired in timers.process_expired() {
//!     assert_eq!(fired, id);
//! }
//! ```

mod error;
pub mod logging;
pub mod signal;
pub mod throttle;
mod timer;

pub use error::{CoreError, Result, TimerError};
pub use signal::{ConnectionId, Signal};
pub use throttle::Throttle;
pub use timer::{
    Clock, ManualClock, Scheduler, SharedTimerManager, SystemClock, TimerId, TimerManager,
};
