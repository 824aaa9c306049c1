//! Validation, commit and change notification for edited text.
//!
//! A [`ValueController`] receives the candidate strings produced by the
//! [`SegmentEditor`](crate::SegmentEditor), validates them through a
//! [`DateLib`], and decides what is displayed.
//!
//! # Modes
//!
//! - **Uncontrolled**: the controller owns the value. A valid candidate is
//!   committed immediately.
//! - **Controlled**: the owner supplies the value with
//!   [`set_external_value`](ValueController::set_external_value). A valid
//!   candidate is staged and displayed until the throttled notification has
//!   been delivered, after which the owner's value is shown again.
//!
//! In both modes `value_changed` is emitted on the trailing edge of a
//! throttle window, carrying the latest valid value.
//!
//! # Drafts
//!
//! A candidate with a cleared field is shown as a draft. It is never
//! committed and never notified; the next valid candidate replaces it.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use horizon_datefield_core::logging::targets;
use horizon_datefield_core::{Scheduler, Signal, Throttle, TimerId};

use crate::date_lib::{DateLib, ParseOutcome};
use crate::format::ParsedFormat;
use crate::locale::Locale;

/// Who owns the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The controller owns the value.
    #[default]
    Uncontrolled,
    /// An external owner supplies the value.
    Controlled,
}

/// What happened to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// Valid; committed (uncontrolled) or staged (controlled).
    Committed,
    /// Incomplete; displayed but not committed.
    Draft,
    /// Identical to what is displayed.
    Unchanged,
    /// Invalid; nothing changed.
    Rejected,
}

impl CandidateOutcome {
    /// Check whether the candidate is now displayed.
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            CandidateOutcome::Committed | CandidateOutcome::Draft | CandidateOutcome::Unchanged
        )
    }
}

/// Payload of the `value_changed` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChange {
    /// The value rendered with the input's format.
    pub text: String,
    pub value: NaiveDateTime,
}

/// Validates candidates and owns the displayed value.
pub struct ValueController {
    format: Arc<ParsedFormat>,
    date_lib: Arc<dyn DateLib>,
    locale: Locale,
    mode: Mode,

    /// Committed value in uncontrolled mode.
    local: Option<NaiveDateTime>,
    /// Owner's value in controlled mode.
    external: Option<NaiveDateTime>,
    /// Valid edit awaiting notification in controlled mode.
    staged: Option<NaiveDateTime>,
    /// Incomplete text being displayed.
    draft: Option<String>,

    throttle: Throttle<ValueChange>,

    /// Signal emitted when a valid edit has settled.
    pub value_changed: Signal<ValueChange>,
}

impl ValueController {
    /// Create an uncontrolled controller holding `initial`.
    pub fn new(
        format: Arc<ParsedFormat>,
        date_lib: Arc<dyn DateLib>,
        locale: Locale,
        initial: Option<NaiveDateTime>,
        scheduler: Arc<dyn Scheduler>,
        throttle: Duration,
    ) -> Self {
        Self {
            format,
            date_lib,
            locale,
            mode: Mode::Uncontrolled,
            local: initial,
            external: None,
            staged: None,
            draft: None,
            throttle: Throttle::new(scheduler, throttle),
            value_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Value Access
    // =========================================================================

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn format(&self) -> &ParsedFormat {
        &self.format
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The value being displayed, ignoring drafts.
    pub fn value(&self) -> Option<NaiveDateTime> {
        match self.mode {
            Mode::Uncontrolled => self.local,
            Mode::Controlled => self.staged.or(self.external),
        }
    }

    /// The incomplete text being displayed, if any.
    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    /// The text the host should display.
    pub fn display_text(&self) -> String {
        if let Some(draft) = &self.draft {
            return draft.clone();
        }
        match self.value() {
            Some(value) => self.render(&value),
            None => self.format.placeholder_text(),
        }
    }

    /// Set the value programmatically in uncontrolled mode.
    ///
    /// Drops any draft and pending notification. Ignored in controlled mode.
    pub fn set_value(&mut self, value: Option<NaiveDateTime>) {
        if self.mode == Mode::Controlled {
            tracing::debug!(target: targets::CONTROLLER, "set_value ignored in controlled mode");
            return;
        }
        self.local = value;
        self.draft = None;
        self.throttle.cancel();
    }

    /// Supply the owner's value.
    ///
    /// `Some` switches to controlled mode. A value that differs from the last
    /// one observed wins over any staged edit or draft. `None` returns to
    /// uncontrolled mode, keeping what is displayed.
    ///
    /// Returns `true` if the displayed value was replaced.
    pub fn set_external_value(&mut self, value: Option<NaiveDateTime>) -> bool {
        match value {
            Some(value) => {
                let changed = self.mode == Mode::Uncontrolled || self.external != Some(value);
                self.mode = Mode::Controlled;
                if changed {
                    tracing::debug!(
                        target: targets::CONTROLLER,
                        %value,
                        "external value changed"
                    );
                    self.external = Some(value);
                    self.staged = None;
                    self.draft = None;
                    self.local = None;
                    self.throttle.cancel();
                }
                changed
            }
            None => {
                if self.mode == Mode::Controlled {
                    self.local = self.value();
                    self.mode = Mode::Uncontrolled;
                    self.external = None;
                    self.staged = None;
                }
                false
            }
        }
    }

    /// Drop the draft so the committed value is displayed again.
    ///
    /// Returns `true` if there was a draft.
    pub fn discard_draft(&mut self) -> bool {
        let discarded = self.draft.take();
        if let Some(draft) = &discarded {
            tracing::debug!(target: targets::CONTROLLER, draft = %draft, "draft discarded");
        }
        discarded.is_some()
    }

    // =========================================================================
    // Candidates
    // =========================================================================

    /// Validate `text` and update what is displayed.
    pub fn set_candidate(&mut self, text: &str) -> CandidateOutcome {
        if text == self.display_text() {
            return CandidateOutcome::Unchanged;
        }

        match self.date_lib.parse(text, &self.format, &self.locale) {
            ParseOutcome::Invalid => {
                tracing::debug!(target: targets::CONTROLLER, candidate = text, "candidate rejected");
                CandidateOutcome::Rejected
            }
            ParseOutcome::Incomplete => {
                tracing::trace!(target: targets::CONTROLLER, candidate = text, "draft");
                self.draft = Some(text.to_string());
                CandidateOutcome::Draft
            }
            ParseOutcome::Valid(value) => {
                self.draft = None;
                match self.mode {
                    Mode::Uncontrolled => self.local = Some(value),
                    Mode::Controlled => self.staged = Some(value),
                }
                let text = self.render(&value);
                tracing::debug!(
                    target: targets::CONTROLLER,
                    mode = ?self.mode,
                    text = %text,
                    "candidate committed"
                );
                self.throttle.push(ValueChange { text, value });
                CandidateOutcome::Committed
            }
        }
    }

    // =========================================================================
    // Notification
    // =========================================================================

    /// Check whether a notification is waiting on the throttle.
    pub fn is_pending(&self) -> bool {
        self.throttle.is_pending()
    }

    pub fn throttle_interval(&self) -> Duration {
        self.throttle.interval()
    }

    /// Deliver the pending notification if `id` is the throttle's timer.
    ///
    /// Returns `true` if the timer belonged to this controller.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if self.throttle.timer() != Some(id) {
            return false;
        }
        if let Some(change) = self.throttle.on_timer(id) {
            self.deliver(change);
        }
        true
    }

    /// Deliver the pending notification now.
    pub fn flush(&mut self) {
        if let Some(change) = self.throttle.flush() {
            self.deliver(change);
        }
    }

    fn deliver(&mut self, change: ValueChange) {
        if self.mode == Mode::Controlled {
            self.staged = None;
        }
        tracing::debug!(target: targets::CONTROLLER, text = %change.text, "value_changed");
        self.value_changed.emit(change);
    }

    fn render(&self, value: &NaiveDateTime) -> String {
        self.date_lib.format(value, &self.format, &self.locale)
    }
}

impl std::fmt::Debug for ValueController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueController")
            .field("format", &self.format.pattern())
            .field("locale", &self.locale.id())
            .field("mode", &self.mode)
            .field("value", &self.value())
            .field("draft", &self.draft)
            .field("pending", &self.throttle.is_pending())
            .finish()
    }
}

static_assertions::assert_impl_all!(ValueController: Send, Sync);
