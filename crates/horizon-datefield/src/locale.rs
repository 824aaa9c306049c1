//! Locale name tables.
//!
//! Name fields (`MMM`, `ddd`, `A`) are rendered at a fixed width like every
//! other field, so each table here uses names of a single character width.

use crate::error::{Error, Result};

/// Month, weekday and meridiem names for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    id: &'static str,
    months: [&'static str; 12],
    /// Sunday first.
    weekdays: [&'static str; 7],
    meridiem: [&'static str; 2],
}

const EN_US: Locale = Locale {
    id: "en-US",
    months: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekdays: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    meridiem: ["AM", "PM"],
};

const EN_GB: Locale = Locale {
    id: "en-GB",
    ..EN_US
};

const ES_ES: Locale = Locale {
    id: "es-ES",
    months: [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
    ],
    weekdays: ["dom", "lun", "mar", "mié", "jue", "vie", "sáb"],
    meridiem: ["AM", "PM"],
};

const DE_DE: Locale = Locale {
    id: "de-DE",
    months: [
        "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
    ],
    weekdays: ["So.", "Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa."],
    meridiem: ["AM", "PM"],
};

const KNOWN: [(&str, Locale); 7] = [
    ("en", EN_US),
    ("en-us", EN_US),
    ("en-gb", EN_GB),
    ("es", ES_ES),
    ("es-es", ES_ES),
    ("de", DE_DE),
    ("de-de", DE_DE),
];

impl Locale {
    /// Look up a locale by identifier (`"en-US"`, `"de_DE"`, `"es"`, ...).
    pub fn from_id(id: &str) -> Result<Self> {
        let normalized = id.trim().replace('_', "-").to_ascii_lowercase();
        KNOWN
            .iter()
            .find(|(key, _)| *key == normalized)
            .map(|(_, locale)| *locale)
            .ok_or_else(|| Error::UnknownLocale(id.to_string()))
    }

    /// The locale of the running system, falling back to its language and
    /// then to `en-US` when no table matches.
    pub fn system() -> Self {
        let id = sys_locale::get_locale().unwrap_or_else(|| "en-US".to_string());
        Self::from_id(&id)
            .or_else(|_| Self::from_id(id.split(['-', '_']).next().unwrap_or_default()))
            .unwrap_or_default()
    }

    /// The canonical identifier.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Abbreviated name of `month` (1-12).
    pub fn month_abbrev(&self, month: u32) -> Option<&'static str> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.months.get(index).copied()
    }

    /// Month number (1-12) for an abbreviated name, ignoring case.
    pub fn month_from_abbrev(&self, name: &str) -> Option<u32> {
        position_ignore_case(&self.months, name).map(|i| i as u32 + 1)
    }

    /// Abbreviated weekday name, `0` being Sunday.
    pub fn weekday_abbrev(&self, weekday: u32) -> Option<&'static str> {
        self.weekdays.get(usize::try_from(weekday).ok()?).copied()
    }

    /// Weekday index (0 = Sunday) for an abbreviated name, ignoring case.
    pub fn weekday_from_abbrev(&self, name: &str) -> Option<u32> {
        position_ignore_case(&self.weekdays, name).map(|i| i as u32)
    }

    /// Meridiem marker, upper- or lowercase.
    pub fn meridiem(&self, pm: bool, lowercase: bool) -> String {
        let marker = self.meridiem[usize::from(pm)];
        if lowercase {
            marker.to_lowercase()
        } else {
            marker.to_string()
        }
    }

    /// `Some(true)` for PM, `Some(false)` for AM, ignoring case.
    pub fn meridiem_from(&self, text: &str) -> Option<bool> {
        position_ignore_case(&self.meridiem, text).map(|i| i == 1)
    }

    /// Character width of every month abbreviation.
    pub fn month_width(&self) -> usize {
        self.months[0].chars().count()
    }

    /// Character width of every weekday abbreviation.
    pub fn weekday_width(&self) -> usize {
        self.weekdays[0].chars().count()
    }

    /// Character width of the meridiem markers.
    pub fn meridiem_width(&self) -> usize {
        self.meridiem[0].chars().count()
    }
}

impl Default for Locale {
    fn default() -> Self {
        EN_US
    }
}

fn position_ignore_case(names: &[&str], text: &str) -> Option<usize> {
    let wanted = text.to_lowercase();
    names.iter().position(|name| name.to_lowercase() == wanted)
}
