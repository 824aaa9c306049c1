//! Display format parsing.
//!
//! A display format such as `"MM/DD/YYYY hh:mm A"` is compiled once into a
//! [`ParsedFormat`]: the ordered [`Segment`]s of the rendered string and a
//! [`PositionTable`] mapping every character offset to the segment that owns
//! it. Both are immutable and reused for every keystroke until the format
//! changes.
//!
//! # Directives
//!
//! | Token  | Field | Width |
//! |--------|-------|-------|
//! | `YYYY` | Year | 4 |
//! | `YY`   | Two-digit year | 2 |
//! | `MMM`  | Month name | locale |
//! | `MM`   | Month | 2 |
//! | `DD`   | Day of month | 2 |
//! | `ddd`  | Weekday name (read-only) | locale |
//! | `HH`   | Hour, 24-hour clock | 2 |
//! | `hh`   | Hour, 12-hour clock | 2 |
//! | `mm`   | Minute | 2 |
//! | `ss`   | Second | 2 |
//! | `SSS`  | Millisecond | 3 |
//! | `A`/`a`| AM/PM, upper/lowercase | locale |
//!
//! Text inside `[...]` is always literal. Any other character is a literal
//! separator.
//!
//! # Example
//!
//! ```
//! use horizon_datefield::format::ParsedFormat;
//!
//! let format = ParsedFormat::parse("YYYY-MM-DD").unwrap();
//! assert_eq!(format.width(), 10);
//! assert_eq!(format.segments().len(), 5);
//! assert!(format.segment_at(5).unwrap().is_field());
//! ```

mod segment;

pub use segment::{FieldKind, FieldSpec, FieldText, Handler, PLACEHOLDER, Segment, SegmentKind};

use horizon_datefield_core::logging::targets;

use crate::error::{Error, Result};
use crate::locale::Locale;

/// Recognized directives, longest first so `YYYY` wins over `YY`.
const DIRECTIVES: [(&str, FieldKind); 13] = [
    ("YYYY", FieldKind::Year),
    ("SSS", FieldKind::Millisecond),
    ("MMM", FieldKind::MonthName),
    ("ddd", FieldKind::Weekday),
    ("YY", FieldKind::ShortYear),
    ("MM", FieldKind::Month),
    ("DD", FieldKind::Day),
    ("HH", FieldKind::Hour24),
    ("hh", FieldKind::Hour12),
    ("mm", FieldKind::Minute),
    ("ss", FieldKind::Second),
    ("A", FieldKind::Meridiem { lowercase: false }),
    ("a", FieldKind::Meridiem { lowercase: true }),
];

/// A token of the format pattern, before offsets are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field(FieldKind),
}

/// Mapping from character offset to the index of the owning segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTable {
    owners: Vec<usize>,
}

impl PositionTable {
    fn build(segments: &[Segment]) -> Self {
        let mut owners = Vec::with_capacity(segments.last().map_or(0, |s| s.end + 1));
        for segment in segments {
            owners.extend(std::iter::repeat_n(segment.index, segment.len()));
        }
        Self { owners }
    }

    /// The segment index owning `offset`, if the offset is inside the string.
    pub fn get(&self, offset: usize) -> Option<usize> {
        self.owners.get(offset).copied()
    }

    /// Number of offsets covered.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// A compiled display format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFormat {
    pattern: String,
    locale: Locale,
    segments: Vec<Segment>,
    positions: PositionTable,
}

impl ParsedFormat {
    /// Compile `pattern` with the default locale.
    pub fn parse(pattern: &str) -> Result<Self> {
        Self::parse_with_locale(pattern, &Locale::default())
    }

    /// Compile `pattern`, taking name field widths from `locale`.
    ///
    /// Fails with [`Error::InvalidFormat`] when the pattern holds no field
    /// directive.
    pub fn parse_with_locale(pattern: &str, locale: &Locale) -> Result<Self> {
        let tokens = tokenize(pattern);
        if !tokens.iter().any(|t| matches!(t, Token::Field(_))) {
            tracing::debug!(target: targets::FORMAT, pattern, "format has no editable field");
            return Err(Error::invalid_format(pattern));
        }

        let mut segments = Vec::with_capacity(tokens.len());
        let mut offset = 0;
        for (index, token) in tokens.into_iter().enumerate() {
            let (width, kind) = match token {
                Token::Literal(text) => (text.chars().count(), SegmentKind::Literal(text)),
                Token::Field(kind) => {
                    let spec = FieldSpec::new(kind, locale);
                    (spec.width, SegmentKind::Field(spec))
                }
            };
            segments.push(Segment {
                index,
                start: offset,
                end: offset + width - 1,
                kind,
            });
            offset += width;
        }

        let positions = PositionTable::build(&segments);
        tracing::trace!(
            target: targets::FORMAT,
            pattern,
            segments = segments.len(),
            width = positions.len(),
            "format compiled"
        );

        Ok(Self {
            pattern: pattern.to_string(),
            locale: *locale,
            segments,
            positions,
        })
    }

    /// The original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The locale name widths were taken from.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// All segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The offset lookup table.
    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    /// Rendered width in characters.
    pub fn width(&self) -> usize {
        self.positions.len()
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// The segment owning character `offset`.
    pub fn segment_at(&self, offset: usize) -> Option<&Segment> {
        self.positions.get(offset).and_then(|i| self.segments.get(i))
    }

    /// Iterate over field segments only.
    pub fn fields(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_field())
    }

    /// First field of the given kind.
    pub fn field_of(&self, kind: FieldKind) -> Option<&Segment> {
        self.fields()
            .find(|s| s.field().is_some_and(|f| f.kind == kind))
    }

    /// The first field after segment `index`.
    pub fn next_field(&self, index: usize) -> Option<&Segment> {
        self.segments.iter().skip(index + 1).find(|s| s.is_field())
    }

    /// The last field before segment `index`.
    pub fn prev_field(&self, index: usize) -> Option<&Segment> {
        self.segments[..index.min(self.segments.len())]
            .iter()
            .rev()
            .find(|s| s.is_field())
    }

    /// The rendered string with every field cleared.
    pub fn placeholder_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| match &s.kind {
                SegmentKind::Literal(text) => text.clone(),
                SegmentKind::Field(spec) => spec.placeholder(),
            })
            .collect()
    }
}

/// Split a pattern into literal runs and field directives.
fn tokenize(pattern: &str) -> Vec<Token> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        // Escaped literal block
        if chars[i] == '[' {
            if let Some(close) = chars[i + 1..].iter().position(|&c| c == ']') {
                literal.extend(&chars[i + 1..i + 1 + close]);
                i += close + 2;
            } else {
                literal.push('[');
                i += 1;
            }
            continue;
        }

        let directive = DIRECTIVES.iter().find(|(token, _)| {
            let len = token.len();
            i + len <= chars.len() && token.chars().eq(chars[i..i + len].iter().copied())
        });

        match directive {
            Some((token, kind)) => {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Field(*kind));
                i += token.len();
            }
            None => {
                literal.push(chars[i]);
                i += 1;
            }
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

/// The characters of `text` in `[start, end)`.
pub(crate) fn slice_chars(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// `text` with the characters in `[start, end)` replaced by `replacement`.
pub(crate) fn splice_chars(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let mut out: String = text.chars().take(start).collect();
    out.push_str(replacement);
    out.extend(text.chars().skip(end));
    out
}

static_assertions::assert_impl_all!(ParsedFormat: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(format: &ParsedFormat) -> Vec<Option<FieldKind>> {
        format
            .segments()
            .iter()
            .map(|s| s.field().map(|f| f.kind))
            .collect()
    }

    #[test]
    fn test_parse_iso_date() {
        let format = ParsedFormat::parse("YYYY-MM-DD").unwrap();
        assert_eq!(
            kinds(&format),
            vec![
                Some(FieldKind::Year),
                None,
                Some(FieldKind::Month),
                None,
                Some(FieldKind::Day)
            ]
        );
        let month = &format.segments()[2];
        assert_eq!((month.start, month.end), (5, 6));
        assert_eq!(month.field().map(|f| (f.min, f.max)), Some((1, 12)));
        assert_eq!(format.width(), 10);
    }

    #[test]
    fn test_positions_cover_every_offset_once() {
        for pattern in [
            "YYYY-MM-DD",
            "MM/DD/YYYY hh:mm A",
            "ddd, DD MMM YYYY HH:mm:ss.SSS",
            "[Week of] YYYY-MM-DD",
            "hh:mm a",
        ] {
            let format = ParsedFormat::parse(pattern).unwrap();
            let mut covered = 0;
            for (i, segment) in format.segments().iter().enumerate() {
                assert_eq!(segment.index, i);
                if i > 0 {
                    assert_eq!(format.segments()[i - 1].end + 1, segment.start, "{pattern}");
                }
                for offset in segment.start..=segment.end {
                    assert_eq!(format.positions().get(offset), Some(i), "{pattern}");
                }
                covered += segment.len();
            }
            assert_eq!(covered, format.width());
            assert_eq!(format.positions().get(format.width()), None);
            assert_eq!(format.placeholder_text().chars().count(), format.width());
        }
    }

    #[test]
    fn test_escaped_literal_block() {
        let format = ParsedFormat::parse("[Day] DD").unwrap();
        assert_eq!(format.segments().len(), 2);
        assert_eq!(
            format.segments()[0].kind,
            SegmentKind::Literal("Day ".to_string())
        );
        assert_eq!(format.placeholder_text(), "Day --");
    }

    #[test]
    fn test_unterminated_bracket_is_literal() {
        let format = ParsedFormat::parse("[DD").unwrap();
        assert_eq!(format.segments()[0].kind, SegmentKind::Literal("[".to_string()));
        assert_eq!(format.width(), 3);
    }

    #[test]
    fn test_twelve_hour_format() {
        let format = ParsedFormat::parse("MM/DD/YYYY hh:mm A").unwrap();
        assert_eq!(format.width(), 19);
        let meridiem = format.segment_at(17).unwrap();
        assert_eq!(
            meridiem.field().map(|f| f.kind),
            Some(FieldKind::Meridiem { lowercase: false })
        );
        assert_eq!(format.placeholder_text(), "--/--/---- --:-- --");
    }

    #[test]
    fn test_no_fields_is_invalid() {
        assert!(matches!(
            ParsedFormat::parse("[YYYY]-/"),
            Err(Error::InvalidFormat { pattern }) if pattern == "[YYYY]-/"
        ));
        assert!(ParsedFormat::parse("").is_err());
    }

    #[test]
    fn test_parse_is_pure() {
        let a = ParsedFormat::parse("DD.MM.YY").unwrap();
        let b = ParsedFormat::parse("DD.MM.YY").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_locale_name_widths() {
        let de = Locale::from_id("de-DE").unwrap();
        let format = ParsedFormat::parse_with_locale("ddd DD. MMM", &de).unwrap();
        assert_eq!(format.width(), 3 + 1 + 2 + 2 + 3);
        assert_eq!(format.locale().id(), "de-DE");
    }

    #[test]
    fn test_field_navigation() {
        let format = ParsedFormat::parse("YYYY-MM-DD").unwrap();
        assert_eq!(format.next_field(0).map(|s| s.index), Some(2));
        assert_eq!(format.next_field(4), None);
        assert_eq!(format.prev_field(2).map(|s| s.index), Some(0));
        assert_eq!(format.prev_field(0), None);
        assert_eq!(format.field_of(FieldKind::Day).map(|s| s.start), Some(8));
    }

    #[test]
    fn test_char_helpers() {
        assert_eq!(slice_chars("sáb 01", 0, 3), "sáb");
        assert_eq!(splice_chars("2020-01-15", 5, 7, "--"), "2020----15");
    }
}
