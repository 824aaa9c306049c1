//! Horizon Datefield - format-aware segmented date/time text editing.
//!
//! A date input shows a date as a fixed-width string such as `2020-01-15`
//! and edits it one field at a time: arrow keys step the field under the
//! caret, digits fill it, Backspace clears it. Every edit is validated before
//! it is shown, so the text never stops matching its format.
//!
//! The crate is split in three layers:
//!
//! - [`ParsedFormat`]: compiles a pattern like `"DD MMM YYYY HH:mm"` into
//!   literal and field segments with a character offset table
//! - [`SegmentEditor`]: turns a keystroke into a candidate string and caret
//! - [`ValueController`]: validates candidates through a [`DateLib`], keeps
//!   drafts, and emits throttled `value_changed` notifications
//!
//! [`DateInput`] wires all three to a host text control.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_datefield::prelude::*;
//!
//! let format = Arc::new(ParsedFormat::parse("YYYY-MM-DD").unwrap());
//! let editor = SegmentEditor::new(format.clone());
//!
//! // Caret on the month, press ArrowUp.
//! let ctx = EditContext::new("2020-01-15", Caret::at(5), Key::ArrowUp);
//! let outcome = editor.handle_key(&EditorState::default(), &ctx);
//! let candidate = outcome.candidate.unwrap();
//!
//! let parsed = ChronoDateLib::new().parse(&candidate.value, &format, format.locale());
//! assert!(parsed.is_valid());
//! assert_eq!(candidate.value, "2020-02-15");
//! ```

mod caret;
pub mod controller;
pub mod date_lib;
pub mod editor;
mod error;
pub mod format;
pub mod input;
pub mod locale;
mod options;
pub mod prelude;

pub use caret::Caret;
pub use controller::{CandidateOutcome, Mode, ValueChange, ValueController};
pub use date_lib::{ChronoDateLib, DateLib, ParseOutcome};
pub use editor::{
    Candidate, ClearDirection, EditContext, EditOutcome, EditorState, Key, KeyAction,
    PendingDigits, SegmentEditor,
};
pub use error::{Error, Result};
pub use format::{
    FieldKind, FieldSpec, FieldText, Handler, PLACEHOLDER, ParsedFormat, PositionTable, Segment,
    SegmentKind,
};
pub use input::{AfterKey, DateInput, HostInput, KeyDisposition, KeyEvent, KeyResponse};
pub use locale::Locale;
pub use options::{InputOptions, SYSTEM_LOCALE};
