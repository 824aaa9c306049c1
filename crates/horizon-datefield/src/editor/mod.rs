//! Keystroke handling for segmented date/time text.
//!
//! A [`SegmentEditor`] turns one keystroke into a candidate string and caret.
//! It never commits anything: the candidate is handed to a
//! [`ValueController`](crate::ValueController) for validation. All state that
//! outlives a keystroke (the partially typed digits of a field) is carried in
//! an explicit [`EditorState`] that the caller threads through.
//!
//! # Resolution
//!
//! The field a key applies to is found from the caret start:
//!
//! 1. the segment owning `caret.start`;
//! 2. on a literal, its neighbour: one to the left for backward keys
//!    (Backspace and the stepping keys), one to the right otherwise;
//! 3. the segment owning `caret.start - 1`;
//! 4. the nearest field to the left, then to the right.

mod handlers;
mod key;

use std::sync::Arc;

use horizon_datefield_core::logging::targets;

use crate::caret::Caret;
use crate::format::{ParsedFormat, Segment, splice_chars};

use handlers::{CaretSpec, HandlerInput};
pub use key::{ClearDirection, Key, KeyAction, PAGE_STEP};

/// Digits typed into a field that are not yet shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDigits {
    /// Index of the segment being typed into.
    pub segment: usize,
    /// Digits typed so far, shorter than the field width.
    pub digits: String,
}

/// Editor state carried between keystrokes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    pending: Option<PendingDigits>,
}

impl EditorState {
    /// The pending digit buffer, if any.
    pub fn pending(&self) -> Option<&PendingDigits> {
        self.pending.as_ref()
    }

    /// Check whether no digits are pending.
    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    fn pending_for(&self, segment: usize) -> Option<&PendingDigits> {
        self.pending.as_ref().filter(|p| p.segment == segment)
    }
}

/// One keystroke against the displayed string.
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    /// The displayed string.
    pub value: &'a str,
    /// The host's caret or selection.
    pub caret: Caret,
    pub key: Key,
}

impl<'a> EditContext<'a> {
    pub fn new(value: &'a str, caret: Caret, key: Key) -> Self {
        Self { value, caret, key }
    }
}

/// A proposed new string and caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub value: String,
    pub caret: Caret,
    pub suppress_default: bool,
}

/// The result of one keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// State to pass to the next keystroke.
    pub state: EditorState,
    /// The proposed edit, or `None` when nothing handled the key.
    pub candidate: Option<Candidate>,
    /// Whether the host's native handling of the key must be suppressed.
    pub suppress_default: bool,
    /// Index of the resolved segment.
    pub segment: Option<usize>,
}

/// Applies keystrokes to the fields of a [`ParsedFormat`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_datefield::{Caret, EditContext, EditorState, Key, ParsedFormat, SegmentEditor};
///
/// let format = Arc::new(ParsedFormat::parse("YYYY-MM-DD").unwrap());
/// let editor = SegmentEditor::new(format);
///
/// let ctx = EditContext::new("2020-01-15", Caret::at(5), Key::ArrowUp);
/// let outcome = editor.handle_key(&EditorState::default(), &ctx);
/// let candidate = outcome.candidate.unwrap();
/// assert_eq!(candidate.value, "2020-02-15");
/// assert_eq!(candidate.caret, Caret::new(5, 7));
/// ```
#[derive(Debug, Clone)]
pub struct SegmentEditor {
    format: Arc<ParsedFormat>,
}

impl SegmentEditor {
    pub fn new(format: Arc<ParsedFormat>) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &ParsedFormat {
        &self.format
    }

    /// Find the field segment `key` applies to at `caret`.
    pub fn resolve(&self, caret: Caret, key: &Key) -> Option<&Segment> {
        let format = &*self.format;
        let start = caret.clamped(format.width()).start;
        let at = |offset: Option<usize>| offset.and_then(|o| format.segment_at(o));

        let mut found = at(Some(start));
        if found.is_some_and(Segment::is_literal) {
            let neighbour = if key.is_backward() {
                start.checked_sub(1)
            } else {
                Some(start + 1)
            };
            found = at(neighbour);
        }
        if found.is_none_or(Segment::is_literal) {
            found = at(start.checked_sub(1)).or(found);
        }
        if found.is_none_or(Segment::is_literal) {
            let anchor = found.or_else(|| format.segment_at(start))?.index;
            found = format
                .prev_field(anchor)
                .or_else(|| format.next_field(anchor));
        }

        found.filter(|s| s.is_field())
    }

    /// Resolve the active field and apply the key to it.
    pub fn handle_key(&self, state: &EditorState, ctx: &EditContext<'_>) -> EditOutcome {
        let segment = self.resolve(ctx.caret, &ctx.key);
        self.apply(state, ctx, segment)
    }

    /// Apply the key to an already resolved segment.
    pub fn apply(
        &self,
        state: &EditorState,
        ctx: &EditContext<'_>,
        segment: Option<&Segment>,
    ) -> EditOutcome {
        let width = self.format.width();
        let caret = ctx.caret.clamped(width);

        let handled = segment.zip(ctx.key.action()).and_then(|(segment, action)| {
            let spec = segment.field()?;
            if !spec.handles(action.handler()) {
                return None;
            }
            let input = HandlerInput::new(&self.format, segment, spec, ctx.value);
            let (result, next) = handlers::dispatch(action, &input, state)?;
            Some((segment, result, next))
        });

        let (candidate, next_state) = match handled {
            Some((segment, result, next)) => {
                let value = match &result.value {
                    Some(text) => splice_chars(ctx.value, segment.start, segment.end + 1, text),
                    None => ctx.value.to_string(),
                };
                let caret = match result.caret {
                    CaretSpec::Keep => caret,
                    CaretSpec::WholeField => segment.selection(),
                    CaretSpec::Set(caret) => caret,
                };
                let candidate = Candidate {
                    value,
                    caret: caret.clamped(width),
                    suppress_default: result.prevent_default,
                };
                (Some(candidate), next)
            }
            None if ctx.key.is_always_intercepted() => {
                let offset = if ctx.key.is_backward() {
                    caret.start.saturating_sub(1)
                } else {
                    caret.start + 1
                };
                let candidate = Candidate {
                    value: ctx.value.to_string(),
                    caret: Caret::at(offset).clamped(width),
                    suppress_default: true,
                };
                (Some(candidate), EditorState::default())
            }
            None => (None, EditorState::default()),
        };

        let suppress_default = ctx.key.is_always_intercepted()
            || candidate.as_ref().is_some_and(|c| c.suppress_default);

        tracing::trace!(
            target: targets::EDITOR,
            key = ?ctx.key,
            caret = ?ctx.caret,
            segment = segment.map(|s| s.index),
            candidate = candidate.as_ref().map(|c| c.value.as_str()),
            pending = next_state.pending().map(|p| p.digits.as_str()),
            "key handled"
        );

        EditOutcome {
            state: next_state,
            candidate,
            suppress_default,
            segment: segment.map(|s| s.index),
        }
    }

    /// Write a pending digit buffer into `value`, clamped and zero-padded.
    ///
    /// Returns `None` when nothing is pending.
    pub fn complete_pending(&self, state: &EditorState, value: &str) -> Option<String> {
        let pending = state.pending()?;
        let segment = self.format.segment(pending.segment)?;
        let spec = segment.field()?;
        let text = handlers::complete(spec, &pending.digits);
        Some(splice_chars(value, segment.start, segment.end + 1, &text))
    }
}

static_assertions::assert_impl_all!(SegmentEditor: Send, Sync);
