//! Declarative configuration for a [`DateInput`](crate::DateInput).
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```
//! use horizon_datefield::InputOptions;
//!
//! let options = InputOptions::from_toml_str(r#"
//!     format = "DD.MM.YYYY HH:mm"
//!     locale = "de-DE"
//! "#).unwrap();
//!
//! assert_eq!(options.throttle_ms, 100);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format::ParsedFormat;
use crate::locale::Locale;

/// Locale setting that follows the running system.
pub const SYSTEM_LOCALE: &str = "system";

fn default_locale() -> String {
    Locale::default().id().to_string()
}

fn default_throttle_ms() -> u64 {
    horizon_datefield_core::throttle::DEFAULT_INTERVAL.as_millis() as u64
}

/// Configuration of a date input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOptions {
    /// Display format pattern, e.g. `"YYYY-MM-DD"`.
    pub format: String,
    /// Locale identifier used for names.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Delay before `value_changed` is emitted, in milliseconds.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

impl InputOptions {
    /// Options for `format` with the default locale and throttle.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            locale: default_locale(),
            throttle_ms: default_throttle_ms(),
        }
    }

    /// Parse options from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Set locale using builder pattern.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set throttle interval using builder pattern.
    pub fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Look up the configured locale. `"system"` selects the running
    /// system's locale.
    pub fn resolve_locale(&self) -> Result<Locale> {
        if self.locale.eq_ignore_ascii_case(SYSTEM_LOCALE) {
            return Ok(Locale::system());
        }
        Locale::from_id(&self.locale)
    }

    /// Compile the format with the configured locale.
    pub fn compile(&self) -> Result<(ParsedFormat, Locale)> {
        let locale = self.resolve_locale()?;
        let format = ParsedFormat::parse_with_locale(&self.format, &locale)?;
        Ok((format, locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let options = InputOptions::from_toml_str(r#"format = "YYYY-MM-DD""#).unwrap();
        assert_eq!(options, InputOptions::new("YYYY-MM-DD"));
        assert_eq!(options.locale, "en-US");
        assert_eq!(options.throttle(), Duration::from_millis(100));
    }

    #[test]
    fn test_full_document() {
        let options = InputOptions::from_toml_str(
            r#"
            format = "DD MMM YYYY"
            locale = "es_ES"
            throttle_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(options.throttle_ms, 250);
        let (format, locale) = options.compile().unwrap();
        assert_eq!(locale.id(), "es-ES");
        assert_eq!(format.width(), 11);
    }

    #[test]
    fn test_missing_format_is_an_error() {
        let err = InputOptions::from_toml_str(r#"locale = "en-US""#).unwrap_err();
        assert!(matches!(err, Error::Options(_)));
    }

    #[test]
    fn test_system_locale_option() {
        let options = InputOptions::new("DD MMM YYYY").with_locale("System");
        assert!(options.compile().is_ok());
    }

    #[test]
    fn test_compile_errors() {
        let unknown = InputOptions::new("YYYY").with_locale("xx-XX");
        assert!(matches!(unknown.compile(), Err(Error::UnknownLocale(_))));

        let literal_only = InputOptions::new("[plain text]");
        assert!(matches!(literal_only.compile(), Err(Error::InvalidFormat { .. })));
    }
}
