//! Error types for clause construction, configuration and request plumbing

/// elasticdsl errors
///
/// Transport failures are not represented here: the transport reports them
/// as synthetic `{"error": ...}` response documents instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("No such request method: {0}")]
    InvalidMethod(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable identifier for the error category
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidValue { .. } => "invalid_value",
            Self::NotSupported(_) => "not_supported",
            Self::InvalidMethod(_) => "invalid_method",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Json(_) => "json",
            Self::Config(_) => "config",
            Self::Toml(_) => "config",
            Self::Io(_) => "io",
        }
    }

    /// Whether the error comes from a malformed builder call
    pub fn is_builder_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidValue { .. } | Self::NotSupported(_)
        )
    }
}

/// Fail with [`Error::MissingField`] when a mandatory string input is empty.
pub(crate) fn require(value: &str, field: &'static str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingField(field));
    }
    Ok(())
}

/// Fail with [`Error::MissingField`] when a mandatory list input is empty.
pub(crate) fn require_non_empty<T>(values: &[T], field: &'static str) -> crate::Result<()> {
    if values.is_empty() {
        return Err(Error::MissingField(field));
    }
    Ok(())
}
