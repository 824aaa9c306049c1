//! Error types for the date input.

/// Result type alias for date input operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring a date input.
///
/// Rejected keystrokes are not errors: an edit that fails validation simply
/// leaves the input unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The format string has no editable field directive.
    #[error("Invalid format '{pattern}': no editable date/time field")]
    InvalidFormat { pattern: String },

    /// The locale identifier is not known.
    #[error("Unknown locale '{0}'")]
    UnknownLocale(String),

    /// Input options could not be deserialized.
    #[error("Invalid input options: {0}")]
    Options(#[from] toml::de::Error),
}

impl Error {
    /// Create an invalid format error.
    pub fn invalid_format(pattern: impl Into<String>) -> Self {
        Self::InvalidFormat {
            pattern: pattern.into(),
        }
    }
}
