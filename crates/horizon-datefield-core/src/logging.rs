//! Logging facilities for Horizon Datefield.
//!
//! Horizon Datefield uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Per-keystroke detail is logged at `trace` level; commits, rejections and
//! notifications at `debug`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem, e.g.
/// `RUST_LOG=horizon_datefield::editor=trace`.
pub mod targets {
    /// Timer system target.
    pub const TIMER: &str = "horizon_datefield_core::timer";
    /// Signal system target.
    pub const SIGNAL: &str = "horizon_datefield_core::signal";
    /// Throttle target.
    pub const THROTTLE: &str = "horizon_datefield_core::throttle";
    /// Format parser target.
    pub const FORMAT: &str = "horizon_datefield::format";
    /// Segment editor target.
    pub const EDITOR: &str = "horizon_datefield::editor";
    /// Value controller target.
    pub const CONTROLLER: &str = "horizon_datefield::controller";
    /// Input facade target.
    pub const INPUT: &str = "horizon_datefield::input";
}

/// Span names used for tracing.
pub mod span_names {
    /// A single keystroke, from resolution to commit.
    pub const KEYSTROKE: &str = "horizon_datefield::keystroke";
}
