//! Prelude module for Horizon Datefield.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use horizon_datefield::prelude::*;
//! ```

// ============================================================================
// Input
// ============================================================================

pub use crate::input::{DateInput, HostInput, KeyDisposition, KeyResponse};
pub use crate::options::InputOptions;

// ============================================================================
// Editing
// ============================================================================

pub use crate::caret::Caret;
pub use crate::editor::{EditContext, EditorState, Key, SegmentEditor};
pub use crate::format::{FieldKind, ParsedFormat};

// ============================================================================
// Values
// ============================================================================

pub use crate::controller::{CandidateOutcome, ValueChange, ValueController};
pub use crate::date_lib::{ChronoDateLib, DateLib, ParseOutcome};
pub use crate::locale::Locale;

// ============================================================================
// Core
// ============================================================================

pub use horizon_datefield_core::{Scheduler, SharedTimerManager, Signal, TimerId};
