//! Date formatting and validation capability.
//!
//! The editor never does calendar arithmetic itself: it asks a [`DateLib`] to
//! turn a candidate string back into an instant, and to render instants for
//! display. [`ChronoDateLib`] is the implementation used by default.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::format::{FieldKind, FieldText, ParsedFormat, SegmentKind, slice_chars};
use crate::locale::Locale;

/// Result of parsing a rendered string against a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The string denotes a real date/time.
    Valid(NaiveDateTime),
    /// Well-formed, but at least one field is cleared.
    Incomplete,
    /// Not a valid rendering of the format.
    Invalid,
}

impl ParseOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ParseOutcome::Valid(_))
    }

    /// The parsed instant, if valid.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        match self {
            ParseOutcome::Valid(instant) => Some(*instant),
            _ => None,
        }
    }
}

/// Locale-aware date parsing and formatting.
pub trait DateLib: Send + Sync {
    /// Parse `text` as a rendering of `format`.
    fn parse(&self, text: &str, format: &ParsedFormat, locale: &Locale) -> ParseOutcome;

    /// Render `instant` with `format`.
    fn format(&self, instant: &NaiveDateTime, format: &ParsedFormat, locale: &Locale) -> String;
}

/// Components read from a rendered string.
#[derive(Debug, Default)]
struct Parts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour24: Option<u32>,
    hour12: Option<u32>,
    pm: Option<bool>,
    minute: Option<u32>,
    second: Option<u32>,
    millisecond: Option<u32>,
}

impl Parts {
    fn has_date(&self) -> bool {
        self.year.is_some() || self.month.is_some() || self.day.is_some()
    }

    fn hour(&self) -> u32 {
        let pm_offset = if self.pm.unwrap_or(false) { 12 } else { 0 };
        match (self.hour24, self.hour12) {
            (Some(hour), _) => hour,
            (None, Some(hour)) => hour % 12 + pm_offset,
            (None, None) => pm_offset,
        }
    }
}

/// [`DateLib`] built on `chrono`.
///
/// Components missing from the format are taken from a reference date (today,
/// unless one is set): a time-only format yields a time on that date, and a
/// format without a day yields the first of the month.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoDateLib {
    reference: Option<NaiveDate>,
}

impl ChronoDateLib {
    /// Create a date lib using today's local date as the reference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed reference date for components missing from the format.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference = Some(date);
        self
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference.unwrap_or_else(|| Local::now().date_naive())
    }

    fn field_value(instant: &NaiveDateTime, kind: FieldKind) -> Option<u32> {
        let value = match kind {
            FieldKind::Year => u32::try_from(instant.year()).ok()?,
            FieldKind::ShortYear => instant.year().rem_euclid(100) as u32,
            FieldKind::Month | FieldKind::MonthName => instant.month(),
            FieldKind::Day => instant.day(),
            FieldKind::Weekday => instant.weekday().num_days_from_sunday(),
            FieldKind::Hour24 => instant.hour(),
            FieldKind::Hour12 => instant.hour12().1,
            FieldKind::Minute => instant.minute(),
            FieldKind::Second => instant.second(),
            // Leap seconds are folded into the last millisecond.
            FieldKind::Millisecond => (instant.nanosecond() / 1_000_000).min(999),
            FieldKind::Meridiem { .. } => u32::from(instant.hour12().0),
        };
        Some(value)
    }
}

impl DateLib for ChronoDateLib {
    fn parse(&self, text: &str, format: &ParsedFormat, locale: &Locale) -> ParseOutcome {
        if text.chars().count() != format.width() {
            return ParseOutcome::Invalid;
        }

        let mut parts = Parts::default();
        let mut incomplete = false;

        for segment in format.segments() {
            let slice = slice_chars(text, segment.start, segment.end + 1);
            let spec = match &segment.kind {
                SegmentKind::Literal(literal) => {
                    if slice != *literal {
                        return ParseOutcome::Invalid;
                    }
                    continue;
                }
                SegmentKind::Field(spec) => spec,
            };

            let value = match spec.read(&slice, locale) {
                FieldText::Empty => {
                    incomplete = true;
                    continue;
                }
                FieldText::Invalid => return ParseOutcome::Invalid,
                FieldText::Value(value) if value < spec.min || value > spec.max => {
                    return ParseOutcome::Invalid;
                }
                FieldText::Value(value) => value,
            };

            match spec.kind {
                FieldKind::Year => parts.year = Some(value as i32),
                FieldKind::ShortYear => {
                    let century = if value > 68 { 1900 } else { 2000 };
                    parts.year = Some(century + value as i32);
                }
                FieldKind::Month | FieldKind::MonthName => parts.month = Some(value),
                FieldKind::Day => parts.day = Some(value),
                FieldKind::Weekday => {}
                FieldKind::Hour24 => parts.hour24 = Some(value),
                FieldKind::Hour12 => parts.hour12 = Some(value),
                FieldKind::Minute => parts.minute = Some(value),
                FieldKind::Second => parts.second = Some(value),
                FieldKind::Millisecond => parts.millisecond = Some(value),
                FieldKind::Meridiem { .. } => parts.pm = Some(value == 1),
            }
        }

        if incomplete {
            return ParseOutcome::Incomplete;
        }

        let date = if parts.has_date() {
            // Units above the largest one read come from the reference date,
            // the ones below it start at their minimum.
            let reference = self.reference_date();
            let month = match (parts.year, parts.month) {
                (_, Some(month)) => month,
                (None, None) => reference.month(),
                (Some(_), None) => 1,
            };
            let year = parts.year.unwrap_or_else(|| reference.year());
            NaiveDate::from_ymd_opt(year, month, parts.day.unwrap_or(1))
        } else {
            Some(self.reference_date())
        };
        let time = NaiveTime::from_hms_milli_opt(
            parts.hour(),
            parts.minute.unwrap_or(0),
            parts.second.unwrap_or(0),
            parts.millisecond.unwrap_or(0),
        );

        match (date, time) {
            (Some(date), Some(time)) => ParseOutcome::Valid(NaiveDateTime::new(date, time)),
            _ => ParseOutcome::Invalid,
        }
    }

    fn format(&self, instant: &NaiveDateTime, format: &ParsedFormat, locale: &Locale) -> String {
        format
            .segments()
            .iter()
            .map(|segment| match &segment.kind {
                SegmentKind::Literal(text) => text.clone(),
                SegmentKind::Field(spec) => Self::field_value(instant, spec.kind)
                    .and_then(|value| spec.render(value, locale))
                    .unwrap_or_else(|| spec.placeholder()),
            })
            .collect()
    }
}

static_assertions::assert_impl_all!(ChronoDateLib: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn lib() -> ChronoDateLib {
        ChronoDateLib::new().with_reference_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn roundtrip(pattern: &str, text: &str) {
        let format = ParsedFormat::parse(pattern).unwrap();
        let locale = Locale::default();
        let parsed = lib().parse(text, &format, &locale);
        let instant = parsed.instant().unwrap_or_else(|| panic!("{text} should parse"));
        assert_eq!(lib().format(&instant, &format, &locale), text);
    }

    #[test]
    fn test_round_trip() {
        roundtrip("YYYY-MM-DD", "2020-01-15");
        roundtrip("MM/DD/YYYY hh:mm A", "02/29/2024 12:05 AM");
        roundtrip("MM/DD/YYYY hh:mm A", "12/31/1999 11:59 PM");
        roundtrip("ddd, DD MMM YYYY HH:mm:ss.SSS", "Mon, 15 Jan 2024 23:59:58.250");
        roundtrip("DD.MM.YY", "01.07.69");
        roundtrip("hh:mm a", "07:30 pm");
    }

    #[test]
    fn test_parse_values() {
        let locale = Locale::default();
        let format = ParsedFormat::parse("MM/DD/YYYY hh:mm A").unwrap();
        assert_eq!(
            lib().parse("03/04/2021 12:15 PM", &format, &locale),
            ParseOutcome::Valid(dt(2021, 3, 4, 12, 15, 0))
        );
        assert_eq!(
            lib().parse("03/04/2021 12:15 AM", &format, &locale),
            ParseOutcome::Valid(dt(2021, 3, 4, 0, 15, 0))
        );
    }

    #[test]
    fn test_short_year_pivot() {
        let locale = Locale::default();
        let format = ParsedFormat::parse("YY").unwrap();
        let year = |text: &str| lib().parse(text, &format, &locale).instant().map(|i| i.year());
        assert_eq!(year("68"), Some(2068));
        assert_eq!(year("69"), Some(1969));
    }

    #[test]
    fn test_calendar_validation() {
        let locale = Locale::default();
        let format = ParsedFormat::parse("YYYY-MM-DD").unwrap();
        let parse = |text: &str| lib().parse(text, &format, &locale);
        assert_eq!(parse("2023-02-29"), ParseOutcome::Invalid);
        assert!(parse("2024-02-29").is_valid());
        assert_eq!(parse("2020-01-32"), ParseOutcome::Invalid);
        assert_eq!(parse("2020-13-01"), ParseOutcome::Invalid);
        assert_eq!(parse("2020/01/15"), ParseOutcome::Invalid);
        assert_eq!(parse("2020-01-1"), ParseOutcome::Invalid);
        assert_eq!(parse("2020-0x-15"), ParseOutcome::Invalid);
    }

    #[test]
    fn test_cleared_field_is_incomplete() {
        let locale = Locale::default();
        let format = ParsedFormat::parse("YYYY-MM-DD").unwrap();
        assert_eq!(
            lib().parse("2020----15", &format, &locale),
            ParseOutcome::Incomplete
        );
        // An invalid field wins over a cleared one.
        assert_eq!(
            lib().parse("2020----40", &format, &locale),
            ParseOutcome::Invalid
        );
    }

    #[test]
    fn test_missing_components_use_reference() {
        let locale = Locale::default();
        let time_only = ParsedFormat::parse("HH:mm").unwrap();
        assert_eq!(
            lib().parse("08:45", &time_only, &locale),
            ParseOutcome::Valid(dt(2024, 6, 1, 8, 45, 0))
        );

        let month_day = ParsedFormat::parse("MM-DD").unwrap();
        assert_eq!(
            lib().parse("02-29", &month_day, &locale),
            ParseOutcome::Valid(dt(2024, 2, 29, 0, 0, 0))
        );
    }

    #[test]
    fn test_day_without_month_keeps_reference_month() {
        let locale = Locale::default();
        let day_only = ParsedFormat::parse("DD").unwrap();
        assert_eq!(
            lib().parse("16", &day_only, &locale),
            ParseOutcome::Valid(dt(2024, 6, 16, 0, 0, 0))
        );
        assert_eq!(lib().parse("31", &day_only, &locale), ParseOutcome::Invalid);

        let year_day = ParsedFormat::parse("YYYY DD").unwrap();
        assert_eq!(
            lib().parse("2021 16", &year_day, &locale),
            ParseOutcome::Valid(dt(2021, 1, 16, 0, 0, 0))
        );
    }

    #[test]
    fn test_day_step_keeps_weekday_in_step() {
        let locale = Locale::default();
        let format = ParsedFormat::parse("ddd DD").unwrap();
        let shown = lib().format(&dt(2024, 6, 15, 0, 0, 0), &format, &locale);
        assert_eq!(shown, "Sat 15");

        // The day moves on while the weekday text lags until reformatted.
        let parsed = lib().parse("Sat 16", &format, &locale).instant().unwrap();
        assert_eq!(parsed.month(), 6);
        assert_eq!(lib().format(&parsed, &format, &locale), "Sun 16");
    }

    #[test]
    fn test_weekday_is_ignored_when_parsing() {
        let locale = Locale::default();
        let format = ParsedFormat::parse("ddd DD").unwrap();
        assert!(lib().parse("Fri 03", &format, &locale).is_valid());
        assert_eq!(
            lib().parse("Xyz 03", &format, &locale),
            ParseOutcome::Invalid
        );
    }

    #[test]
    fn test_localized_format() {
        let de = Locale::from_id("de-DE").unwrap();
        let format = ParsedFormat::parse_with_locale("ddd DD. MMM YYYY", &de).unwrap();
        let text = lib().format(&dt(2024, 3, 3, 0, 0, 0), &format, &de);
        assert_eq!(text, "So. 03. Mär 2024");
        assert!(lib().parse(&text, &format, &de).is_valid());
    }
}
