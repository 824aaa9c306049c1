//! Per-action field handlers.
//!
//! Each handler sees one field and returns the replacement text for that
//! field's span (if any), where the caret should go, and the pending digit
//! buffer to carry into the next keystroke.

use crate::caret::Caret;
use crate::format::{FieldKind, FieldSpec, FieldText, ParsedFormat, Segment, slice_chars};

use super::key::{ClearDirection, KeyAction};
use super::{EditorState, PendingDigits};

/// Where the caret goes after a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretSpec {
    /// Leave the caret where it was.
    Keep,
    /// Select the whole active field.
    WholeField,
    /// An explicit caret.
    Set(Caret),
}

/// What a handler produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResult {
    /// Replacement text for the field span; `None` leaves the string alone.
    pub value: Option<String>,
    pub caret: CaretSpec,
    pub prevent_default: bool,
}

impl HandlerResult {
    fn replace(value: String, caret: CaretSpec) -> Self {
        Self {
            value: Some(value),
            caret,
            prevent_default: true,
        }
    }

    fn navigate(caret: CaretSpec) -> Self {
        Self {
            value: None,
            caret,
            prevent_default: true,
        }
    }
}

/// Everything a handler may look at.
pub(crate) struct HandlerInput<'a> {
    pub format: &'a ParsedFormat,
    pub segment: &'a Segment,
    pub spec: &'a FieldSpec,
    /// The full displayed string.
    pub value: &'a str,
    /// The active field's slice of `value`.
    pub current: String,
}

impl<'a> HandlerInput<'a> {
    pub fn new(
        format: &'a ParsedFormat,
        segment: &'a Segment,
        spec: &'a FieldSpec,
        value: &'a str,
    ) -> Self {
        Self {
            format,
            segment,
            spec,
            value,
            current: slice_chars(value, segment.start, segment.end + 1),
        }
    }
}

/// Run the handler for `action`. `None` means no handler fired.
pub(crate) fn dispatch(
    action: KeyAction,
    input: &HandlerInput<'_>,
    state: &EditorState,
) -> Option<(HandlerResult, EditorState)> {
    match action {
        KeyAction::Digit(digit) => Some(digit_entry(input, state, digit)),
        KeyAction::Step(delta) => step(input, delta).map(idle),
        KeyAction::Clear(direction) => Some(idle(clear(input, direction))),
        KeyAction::Advance => Some(idle(advance(input, state))),
        KeyAction::Letter(letter) => type_ahead(input, letter).map(idle),
    }
}

fn idle(result: HandlerResult) -> (HandlerResult, EditorState) {
    (result, EditorState::default())
}

fn digit_entry(
    input: &HandlerInput<'_>,
    state: &EditorState,
    digit: u8,
) -> (HandlerResult, EditorState) {
    let (segment, spec) = (input.segment, input.spec);
    let mut digits = state
        .pending_for(segment.index)
        .map(|p| p.digits.clone())
        .unwrap_or_default();
    digits.push(char::from(b'0' + digit));

    let past_field = CaretSpec::Set(Caret::at(segment.end + 1));

    // Full buffer: hand the digits over as typed, validation decides.
    if digits.len() >= spec.width {
        return idle(HandlerResult::replace(digits, past_field));
    }

    let value: u32 = digits.parse().unwrap_or(0);
    if value.saturating_mul(10) > spec.max {
        // No further digit can fit; complete now.
        let text = complete(spec, &digits);
        return idle(HandlerResult::replace(text, past_field));
    }

    let caret = CaretSpec::Set(Caret::at(segment.start + digits.len()));
    let state = EditorState {
        pending: Some(PendingDigits {
            segment: segment.index,
            digits,
        }),
    };
    (HandlerResult::navigate(caret), state)
}

/// Clamp a partial digit buffer into bounds and pad it to the field width.
pub(crate) fn complete(spec: &FieldSpec, digits: &str) -> String {
    let value = digits.parse::<u32>().unwrap_or(spec.min).clamp(spec.min, spec.max);
    format!("{:0width$}", value, width = spec.width)
}

fn step(input: &HandlerInput<'_>, delta: i32) -> Option<HandlerResult> {
    let spec = input.spec;
    let locale = input.format.locale();
    let min = i64::from(spec.min);
    let max = i64::from(field_limit(input));

    let next = match spec.read(&input.current, locale) {
        FieldText::Value(current) => {
            let current = i64::from(current).clamp(min, max);
            min + (current - min + i64::from(delta)).rem_euclid(max - min + 1)
        }
        FieldText::Empty | FieldText::Invalid => {
            if delta > 0 {
                min
            } else {
                max
            }
        }
    };

    let text = spec.render(u32::try_from(next).ok()?, locale)?;
    Some(HandlerResult::replace(text, CaretSpec::WholeField))
}

/// Upper bound for stepping: the field max, narrowed to the month length for
/// days when year and month can be read from the string.
fn field_limit(input: &HandlerInput<'_>) -> u32 {
    if input.spec.kind != FieldKind::Day {
        return input.spec.max;
    }

    let read = |kind: FieldKind| -> Option<u32> {
        let segment = input.format.field_of(kind)?;
        let spec = segment.field()?;
        let text = slice_chars(input.value, segment.start, segment.end + 1);
        match spec.read(&text, input.format.locale()) {
            FieldText::Value(v) if (spec.min..=spec.max).contains(&v) => Some(v),
            _ => None,
        }
    };

    let Some(month) = read(FieldKind::Month).or_else(|| read(FieldKind::MonthName)) else {
        return input.spec.max;
    };
    let year = read(FieldKind::Year).map(|y| y as i32).or_else(|| {
        read(FieldKind::ShortYear).map(|y| {
            let century = if y > 68 { 1900 } else { 2000 };
            century + y as i32
        })
    });

    // Unknown year: allow Feb 29.
    days_in_month(year.unwrap_or(2000), month).min(input.spec.max)
}

fn clear(input: &HandlerInput<'_>, direction: ClearDirection) -> HandlerResult {
    let caret = match direction {
        ClearDirection::Backward => CaretSpec::Set(Caret::at(input.segment.start.saturating_sub(1))),
        ClearDirection::Forward => CaretSpec::Keep,
    };
    HandlerResult::replace(input.spec.placeholder(), caret)
}

fn advance(input: &HandlerInput<'_>, state: &EditorState) -> HandlerResult {
    let target = match input.format.next_field(input.segment.index) {
        Some(next) => next.selection(),
        None => Caret::at(input.format.width()),
    };
    let caret = CaretSpec::Set(target);

    match state.pending_for(input.segment.index) {
        Some(pending) => HandlerResult::replace(complete(input.spec, &pending.digits), caret),
        None => HandlerResult::navigate(caret),
    }
}

fn type_ahead(input: &HandlerInput<'_>, letter: char) -> Option<HandlerResult> {
    let spec = input.spec;
    let locale = input.format.locale();
    let wanted: String = letter.to_lowercase().collect();
    let starts_with = |name: &str| name.to_lowercase().starts_with(&wanted);

    let value = match spec.kind {
        FieldKind::Meridiem { .. } => {
            if starts_with(&locale.meridiem(false, true)) {
                0
            } else if starts_with(&locale.meridiem(true, true)) {
                1
            } else {
                return None;
            }
        }
        FieldKind::MonthName => {
            let current = match spec.read(&input.current, locale) {
                FieldText::Value(month) => month,
                _ => 0,
            };
            // Cycle through matches starting after the current month.
            (1..=12)
                .map(|offset| (current + offset - 1) % 12 + 1)
                .find(|&month| locale.month_abbrev(month).is_some_and(starts_with))?
        }
        _ => return None,
    };

    let text = spec.render(value, locale)?;
    Some(HandlerResult::replace(text, CaretSpec::WholeField))
}

/// Get the number of days in a month.
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Check if a year is a leap year.
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
