//! Segments of a rendered date/time string.

use std::fmt;

use crate::caret::Caret;
use crate::locale::Locale;

/// Character shown in every cell of a cleared field.
pub const PLACEHOLDER: char = '-';

/// The calendrical component an editable field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Four-digit year (`YYYY`).
    Year,
    /// Two-digit year (`YY`).
    ShortYear,
    /// Zero-padded month number (`MM`).
    Month,
    /// Abbreviated month name (`MMM`).
    MonthName,
    /// Zero-padded day of month (`DD`).
    Day,
    /// Abbreviated weekday name (`ddd`). Derived from the date, never edited.
    Weekday,
    /// 24-hour clock hour (`HH`).
    Hour24,
    /// 12-hour clock hour (`hh`).
    Hour12,
    /// Minute (`mm`).
    Minute,
    /// Second (`ss`).
    Second,
    /// Millisecond (`SSS`).
    Millisecond,
    /// AM/PM marker (`A`, or `a` for lowercase).
    Meridiem { lowercase: bool },
}

impl FieldKind {
    /// Inclusive numeric bounds of the field.
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            FieldKind::Year => (0, 9999),
            FieldKind::ShortYear => (0, 99),
            FieldKind::Month | FieldKind::MonthName => (1, 12),
            FieldKind::Day => (1, 31),
            FieldKind::Weekday => (0, 6),
            FieldKind::Hour24 => (0, 23),
            FieldKind::Hour12 => (1, 12),
            FieldKind::Minute | FieldKind::Second => (0, 59),
            FieldKind::Millisecond => (0, 999),
            FieldKind::Meridiem { .. } => (0, 1),
        }
    }

    /// Whether the field is rendered as zero-padded digits.
    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            FieldKind::MonthName | FieldKind::Weekday | FieldKind::Meridiem { .. }
        )
    }

    /// Display width in characters for the given locale.
    pub fn width(&self, locale: &Locale) -> usize {
        match self {
            FieldKind::Year => 4,
            FieldKind::Millisecond => 3,
            FieldKind::MonthName => locale.month_width(),
            FieldKind::Weekday => locale.weekday_width(),
            FieldKind::Meridiem { .. } => locale.meridiem_width(),
            _ => 2,
        }
    }

    /// The key handlers this field responds to.
    pub fn handlers(&self) -> &'static [Handler] {
        match self {
            FieldKind::Weekday => &[],
            FieldKind::MonthName | FieldKind::Meridiem { .. } => {
                &[Handler::Step, Handler::Clear, Handler::Advance, Handler::Letter]
            }
            _ => &[Handler::Digit, Handler::Step, Handler::Clear, Handler::Advance],
        }
    }
}

/// Key handler families a field can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Digit entry.
    Digit,
    /// Stepped increment/decrement.
    Step,
    /// Backspace/Delete.
    Clear,
    /// Move to the next field.
    Advance,
    /// Letter type-ahead.
    Letter,
}

/// The text currently shown in a field, interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldText {
    /// Every cell holds the placeholder.
    Empty,
    /// A readable value (not necessarily within bounds).
    Value(u32),
    /// Anything else.
    Invalid,
}

/// An editable field: kind, bounds and display width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub min: u32,
    pub max: u32,
    pub width: usize,
}

impl FieldSpec {
    /// Create the spec for `kind` rendered with `locale`.
    pub fn new(kind: FieldKind, locale: &Locale) -> Self {
        let (min, max) = kind.bounds();
        Self {
            kind,
            min,
            max,
            width: kind.width(locale),
        }
    }

    /// Check whether the field responds to a handler family.
    pub fn handles(&self, handler: Handler) -> bool {
        self.kind.handlers().contains(&handler)
    }

    /// The cleared representation of the field.
    pub fn placeholder(&self) -> String {
        std::iter::repeat_n(PLACEHOLDER, self.width).collect()
    }

    /// Render `value` at the field's width. `None` when the value has no
    /// textual form (an out-of-range month name, for instance).
    pub fn render(&self, value: u32, locale: &Locale) -> Option<String> {
        match self.kind {
            FieldKind::MonthName => locale.month_abbrev(value).map(str::to_string),
            FieldKind::Weekday => locale.weekday_abbrev(value).map(str::to_string),
            FieldKind::Meridiem { lowercase } => match value {
                0 | 1 => Some(locale.meridiem(value == 1, lowercase)),
                _ => None,
            },
            _ => {
                let text = format!("{:0width$}", value, width = self.width);
                (text.len() == self.width).then_some(text)
            }
        }
    }

    /// Interpret the field's current text.
    pub fn read(&self, text: &str, locale: &Locale) -> FieldText {
        if text.chars().count() == self.width && text.chars().all(|c| c == PLACEHOLDER) {
            return FieldText::Empty;
        }
        let value = match self.kind {
            FieldKind::MonthName => locale.month_from_abbrev(text),
            FieldKind::Weekday => locale.weekday_from_abbrev(text),
            FieldKind::Meridiem { .. } => locale.meridiem_from(text).map(u32::from),
            _ => {
                if text.len() == self.width && text.bytes().all(|b| b.is_ascii_digit()) {
                    text.parse().ok()
                } else {
                    None
                }
            }
        };
        value.map_or(FieldText::Invalid, FieldText::Value)
    }
}

/// What a segment holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Fixed separator text.
    Literal(String),
    /// An editable date/time component.
    Field(FieldSpec),
}

/// One contiguous span of the rendered string.
///
/// `start` and `end` are inclusive character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub kind: SegmentKind,
}

impl Segment {
    /// Number of characters the segment spans.
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    /// Segments are never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, SegmentKind::Literal(_))
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, SegmentKind::Field(_))
    }

    /// The field spec, if this is a field.
    pub fn field(&self) -> Option<&FieldSpec> {
        match &self.kind {
            SegmentKind::Field(spec) => Some(spec),
            SegmentKind::Literal(_) => None,
        }
    }

    /// A selection covering the whole segment.
    pub fn selection(&self) -> Caret {
        Caret::new(self.start, self.end + 1)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SegmentKind::Literal(text) => write!(f, "{:?}@{}..={}", text, self.start, self.end),
            SegmentKind::Field(spec) => {
                write!(f, "{:?}@{}..={}", spec.kind, self.start, self.end)
            }
        }
    }
}
