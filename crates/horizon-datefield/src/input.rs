//! The date input: a host text control driven segment by segment.
//!
//! [`DateInput`] owns a [`SegmentEditor`] and a [`ValueController`] and
//! connects them to a host text control through the [`HostInput`] trait. The
//! host forwards key names, focus changes and fired timers; the input tells
//! it whether to suppress native key handling and what caret to show.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_datefield::{Caret, ChronoDateLib, DateInput, HostInput, InputOptions};
//! use horizon_datefield_core::SharedTimerManager;
//!
//! struct TextBox {
//!     text: String,
//!     selection: Caret,
//! }
//!
//! impl HostInput for TextBox {
//!     fn selection(&self) -> Caret {
//!         self.selection
//!     }
//!     fn set_selection(&mut self, caret: Caret) {
//!         self.selection = caret;
//!     }
//!     fn text(&self) -> String {
//!         self.text.clone()
//!     }
//! }
//!
//! let timers = Arc::new(SharedTimerManager::new());
//! let mut input = DateInput::new(
//!     InputOptions::new("YYYY-MM-DD"),
//!     Arc::new(ChronoDateLib::new()),
//!     timers.clone(),
//! )
//! .unwrap();
//!
//! let mut host = TextBox { text: input.display_text(), selection: Caret::at(0) };
//! input.focus_in();
//! let response = input.handle_key(Some(&mut host), "ArrowUp");
//! assert!(response.suppress_default);
//!
//! // Re-render, then let the input place the caret.
//! host.text = input.display_text();
//! input.sync_caret(&mut host);
//! assert_eq!(host.selection, Caret::new(0, 4));
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use horizon_datefield_core::logging::{span_names, targets};
use horizon_datefield_core::{Scheduler, Signal, TimerId};

use crate::caret::Caret;
use crate::controller::{CandidateOutcome, ValueChange, ValueController};
use crate::date_lib::DateLib;
use crate::editor::{Candidate, EditContext, EditorState, Key, SegmentEditor};
use crate::error::Result;
use crate::format::{ParsedFormat, Segment};
use crate::options::InputOptions;

/// The host text control.
pub trait HostInput {
    /// The current caret or selection.
    fn selection(&self) -> Caret;

    /// Move the caret or selection.
    fn set_selection(&mut self, caret: Caret);

    /// The text currently displayed by the control.
    fn text(&self) -> String;
}

/// A keystroke as seen by the key hooks.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent<'a> {
    pub key: Key,
    pub caret: Caret,
    /// The displayed text before the key.
    pub value: &'a str,
    /// The field the key resolved to.
    pub segment: Option<&'a Segment>,
}

/// Result of the `before_key` hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyDisposition {
    /// Let the editor handle the key.
    #[default]
    Continue,
    /// Skip the editor; the host handles the key natively.
    Veto,
}

/// Decisions the `after_key` hook may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AfterKey {
    /// Drop the candidate instead of committing it.
    pub stop: bool,
    /// Whether the host must suppress native handling.
    pub suppress_default: bool,
}

type BeforeKeyHook = Box<dyn Fn(&KeyEvent<'_>) -> KeyDisposition + Send + Sync>;
type AfterKeyHook = Box<dyn Fn(&KeyEvent<'_>, Option<&Candidate>, &mut AfterKey) + Send + Sync>;

/// What the host must do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyResponse {
    /// Suppress the control's native handling of the key.
    pub suppress_default: bool,
    /// What the controller did with the candidate, if one was produced.
    pub outcome: Option<CandidateOutcome>,
    /// Caret waiting to be written back with [`DateInput::sync_caret`].
    pub caret: Option<Caret>,
}

/// A segmented date/time input.
///
/// # Signals
///
/// - `value_changed` (via [`DateInput::value_changed`]): a valid edit has
///   settled
/// - `editing_finished`: focus left the input, or Enter was pressed
pub struct DateInput {
    options: InputOptions,
    editor: SegmentEditor,
    controller: ValueController,
    state: EditorState,
    focused: bool,
    /// Caret to write back once the host shows the current text.
    pending_caret: Option<Caret>,
    before_key: Option<BeforeKeyHook>,
    after_key: Option<AfterKeyHook>,

    /// Signal emitted when editing is finished.
    pub editing_finished: Signal<()>,
}

impl DateInput {
    /// Create an uncontrolled input with no value.
    ///
    /// Fails if the format has no editable field or the locale is unknown.
    pub fn new(
        options: InputOptions,
        date_lib: Arc<dyn DateLib>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self> {
        let (format, locale) = options.compile()?;
        let format = Arc::new(format);
        let controller = ValueController::new(
            format.clone(),
            date_lib,
            locale,
            None,
            scheduler,
            options.throttle(),
        );

        tracing::debug!(
            target: targets::INPUT,
            format = %options.format,
            locale = locale.id(),
            "date input created"
        );

        Ok(Self {
            editor: SegmentEditor::new(format),
            controller,
            options,
            state: EditorState::default(),
            focused: false,
            pending_caret: None,
            before_key: None,
            after_key: None,
            editing_finished: Signal::new(),
        })
    }

    /// Set the initial value using builder pattern.
    pub fn with_value(mut self, value: Option<NaiveDateTime>) -> Self {
        self.controller.set_value(value);
        self
    }

    /// Make the input controlled using builder pattern.
    pub fn with_controlled_value(mut self, value: NaiveDateTime) -> Self {
        self.controller.set_external_value(Some(value));
        self
    }

    /// Install a hook that runs before the editor and may veto the key.
    pub fn with_before_key<F>(mut self, hook: F) -> Self
    where
        F: Fn(&KeyEvent<'_>) -> KeyDisposition + Send + Sync + 'static,
    {
        self.before_key = Some(Box::new(hook));
        self
    }

    /// Install a hook that sees the candidate before it is committed.
    pub fn with_after_key<F>(mut self, hook: F) -> Self
    where
        F: Fn(&KeyEvent<'_>, Option<&Candidate>, &mut AfterKey) + Send + Sync + 'static,
    {
        self.after_key = Some(Box::new(hook));
        self
    }

    // =========================================================================
    // Value Access
    // =========================================================================

    pub fn options(&self) -> &InputOptions {
        &self.options
    }

    pub fn format(&self) -> &ParsedFormat {
        self.editor.format()
    }

    pub fn controller(&self) -> &ValueController {
        &self.controller
    }

    /// The signal emitted when a valid edit has settled.
    pub fn value_changed(&self) -> &Signal<ValueChange> {
        &self.controller.value_changed
    }

    /// The text the host should display.
    pub fn display_text(&self) -> String {
        self.controller.display_text()
    }

    pub fn value(&self) -> Option<NaiveDateTime> {
        self.controller.value()
    }

    /// Set the value in uncontrolled mode.
    pub fn set_value(&mut self, value: Option<NaiveDateTime>) {
        self.state = EditorState::default();
        self.controller.set_value(value);
    }

    /// Supply the owner's value; `None` releases control.
    ///
    /// Digits typed into the replaced value are dropped.
    pub fn set_external_value(&mut self, value: Option<NaiveDateTime>) {
        if self.controller.set_external_value(value) {
            self.state = EditorState::default();
        }
    }

    /// The editor state carried between keystrokes.
    pub fn editor_state(&self) -> &EditorState {
        &self.state
    }

    /// The caret waiting for write-back, if any.
    pub fn pending_caret(&self) -> Option<Caret> {
        self.pending_caret
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    // =========================================================================
    // Event Handling
    // =========================================================================

    /// Handle a key reported by the host.
    ///
    /// Without a host control the key is ignored.
    pub fn handle_key(&mut self, host: Option<&mut dyn HostInput>, key_name: &str) -> KeyResponse {
        let Some(host) = host else {
            tracing::trace!(target: targets::INPUT, key = key_name, "no host control, key ignored");
            return KeyResponse::default();
        };
        let _span = tracing::trace_span!(target: targets::INPUT, span_names::KEYSTROKE, key = key_name).entered();

        let key = Key::from_name(key_name);
        let caret = host.selection();
        let value = self.controller.display_text();
        let segment = self.editor.resolve(caret, &key);
        let event = KeyEvent {
            key,
            caret,
            value: &value,
            segment,
        };

        if let Some(hook) = &self.before_key
            && hook(&event) == KeyDisposition::Veto
        {
            tracing::trace!(target: targets::INPUT, "key vetoed");
            return KeyResponse::default();
        }

        if key == Key::Enter {
            self.finish_editing();
            return KeyResponse::default();
        }

        let outcome = self
            .editor
            .apply(&self.state, &EditContext::new(&value, caret, key), segment);
        let mut after = AfterKey {
            stop: false,
            suppress_default: outcome.suppress_default,
        };
        if let Some(hook) = &self.after_key {
            hook(&event, outcome.candidate.as_ref(), &mut after);
        }

        let mut response = KeyResponse {
            suppress_default: after.suppress_default,
            ..KeyResponse::default()
        };
        if after.stop {
            tracing::trace!(target: targets::INPUT, "commit stopped by hook");
            self.state = EditorState::default();
            return response;
        }

        self.state = outcome.state;
        let Some(candidate) = outcome.candidate else {
            return response;
        };

        let result = self.controller.set_candidate(&candidate.value);
        response.outcome = Some(result);
        if result.is_accepted() {
            self.pending_caret = Some(candidate.caret);
            response.caret = Some(candidate.caret);
            self.sync_caret(host);
        } else {
            self.state = EditorState::default();
        }
        response
    }

    /// Write the pending caret to the host.
    ///
    /// The write is deferred until the host displays the current text and the
    /// input is focused. Returns `true` if the caret was written.
    pub fn sync_caret(&mut self, host: &mut dyn HostInput) -> bool {
        let Some(caret) = self.pending_caret else {
            return false;
        };
        if !self.focused || host.text() != self.controller.display_text() {
            tracing::trace!(target: targets::INPUT, ?caret, "caret write deferred");
            return false;
        }
        host.set_selection(caret);
        self.pending_caret = None;
        true
    }

    pub fn focus_in(&mut self) {
        self.focused = true;
    }

    /// Leave the input: complete typed digits, drop a draft with cleared
    /// fields, deliver the pending notification and emit `editing_finished`.
    pub fn focus_out(&mut self) {
        self.focused = false;
        self.pending_caret = None;
        self.finish_editing();
    }

    /// Route a fired timer. Returns `true` if it belonged to this input.
    pub fn handle_timer(&mut self, id: TimerId) -> bool {
        self.controller.on_timer(id)
    }

    fn finish_editing(&mut self) {
        let display = self.controller.display_text();
        if let Some(text) = self.editor.complete_pending(&self.state, &display) {
            let outcome = self.controller.set_candidate(&text);
            tracing::trace!(target: targets::INPUT, ?outcome, "pending digits completed");
        }
        self.state = EditorState::default();
        self.controller.discard_draft();
        self.controller.flush();
        self.editing_finished.emit(());
    }
}

impl fmt::Debug for DateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateInput")
            .field("options", &self.options)
            .field("controller", &self.controller)
            .field("state", &self.state)
            .field("focused", &self.focused)
            .field("pending_caret", &self.pending_caret)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(DateInput: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_lib::ChronoDateLib;
    use chrono::NaiveDate;
    use horizon_datefield_core::SharedTimerManager;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeHost {
        text: String,
        selection: Caret,
        writes: usize,
    }

    impl HostInput for FakeHost {
        fn selection(&self) -> Caret {
            self.selection
        }

        fn set_selection(&mut self, caret: Caret) {
            self.selection = caret;
            self.writes += 1;
        }

        fn text(&self) -> String {
            self.text.clone()
        }
    }

    fn input() -> DateInput {
        let value = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
        DateInput::new(
            InputOptions::new("YYYY-MM-DD"),
            Arc::new(ChronoDateLib::new()),
            Arc::new(SharedTimerManager::new()),
        )
        .unwrap()
        .with_value(Some(value))
    }

    fn host(input: &DateInput, caret: Caret) -> FakeHost {
        FakeHost {
            text: input.display_text(),
            selection: caret,
            writes: 0,
        }
    }

    #[test]
    fn test_missing_host_is_ignored() {
        let mut input = input();
        let response = input.handle_key(None, "ArrowUp");
        assert_eq!(response, KeyResponse::default());
        assert_eq!(input.display_text(), "2020-01-15");
    }

    #[test]
    fn test_caret_write_waits_for_render() {
        let mut input = input();
        input.focus_in();
        let mut host = host(&input, Caret::at(5));

        let response = input.handle_key(Some(&mut host), "ArrowUp");
        assert_eq!(response.outcome, Some(CandidateOutcome::Committed));
        assert_eq!(host.writes, 0);
        assert_eq!(input.pending_caret(), Some(Caret::new(5, 7)));

        host.text = input.display_text();
        assert!(input.sync_caret(&mut host));
        assert_eq!(host.selection, Caret::new(5, 7));
        assert_eq!(input.pending_caret(), None);
    }

    #[test]
    fn test_caret_not_written_while_unfocused() {
        let mut input = input();
        let mut host = host(&input, Caret::at(8));
        input.handle_key(Some(&mut host), "3");
        assert_eq!(host.writes, 0);
        input.focus_in();
        assert!(input.sync_caret(&mut host));
        assert_eq!(host.selection, Caret::at(9));
    }

    #[test]
    fn test_rejected_candidate_keeps_caret() {
        let mut input = input();
        input.focus_in();
        let mut host = host(&input, Caret::at(8));
        input.handle_key(Some(&mut host), "3");
        let response = input.handle_key(Some(&mut host), "2");
        assert_eq!(response.outcome, Some(CandidateOutcome::Rejected));
        assert_eq!(response.caret, None);
        assert_eq!(input.display_text(), "2020-01-15");
        assert!(input.editor_state().is_idle());
    }

    #[test]
    fn test_before_key_veto() {
        let mut input = input().with_before_key(|event| {
            if event.key == Key::ArrowUp {
                KeyDisposition::Veto
            } else {
                KeyDisposition::Continue
            }
        });
        let mut host = host(&input, Caret::at(5));
        let response = input.handle_key(Some(&mut host), "ArrowUp");
        assert!(!response.suppress_default);
        assert_eq!(input.display_text(), "2020-01-15");

        input.handle_key(Some(&mut host), "ArrowDown");
        assert_eq!(input.display_text(), "2020-12-15");
    }

    #[test]
    fn test_after_key_stop() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut input = input().with_after_key(move |_, candidate, after| {
            if let Some(candidate) = candidate {
                sink.lock().push(candidate.value.clone());
            }
            after.stop = true;
            after.suppress_default = false;
        });
        let mut host = host(&input, Caret::at(5));
        let response = input.handle_key(Some(&mut host), "ArrowUp");
        assert!(!response.suppress_default);
        assert_eq!(response.outcome, None);
        assert_eq!(input.display_text(), "2020-01-15");
        assert_eq!(*seen.lock(), vec!["2020-02-15".to_string()]);
    }

    #[test]
    fn test_focus_out_completes_digits_and_finishes() {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = finished.clone();
        let mut input = input();
        input.editing_finished.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        input.value_changed().connect(move |change| sink.lock().push(change.text.clone()));

        input.focus_in();
        let mut first_host = host(&input, Caret::at(5));
        input.handle_key(Some(&mut first_host), "1");
        assert!(!input.editor_state().is_idle());

        input.focus_out();
        assert_eq!(input.display_text(), "2020-01-15");
        assert!(input.editor_state().is_idle());
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert!(changes.lock().is_empty());

        input.focus_in();
        let mut host = host(&input, Caret::at(0));
        input.handle_key(Some(&mut host), "9");
        input.focus_out();
        assert_eq!(input.display_text(), "0009-01-15");
        assert_eq!(*changes.lock(), vec!["0009-01-15".to_string()]);
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_enter_finishes_editing() {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = finished.clone();
        let mut input = input();
        input.editing_finished.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let mut host = host(&input, Caret::at(0));
        let response = input.handle_key(Some(&mut host), "Enter");
        assert!(!response.suppress_default);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_options() {
        let result = DateInput::new(
            InputOptions::new("[no fields]"),
            Arc::new(ChronoDateLib::new()),
            Arc::new(SharedTimerManager::new()),
        );
        assert!(result.is_err());
    }
}
