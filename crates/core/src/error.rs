/// Result alias that carries the custom [`CarouselError`] type.
pub type Result<T> = std::result::Result<T, CarouselError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum CarouselError {
    /// Free-form failure surfaced to the application as a readable message.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Preset catalogs and configuration files that failed to parse.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Configuration values outside their usable range.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A color string that is neither `#rgb` nor `#rrggbb`.
    #[error("invalid color `{0}`")]
    InvalidColor(String),
    #[error("preset catalog must contain at least one preset")]
    EmptyCatalog,
    #[error("preset `{preset}` references unknown gradient `{gradient}`")]
    UnknownGradient { preset: String, gradient: String },
}

impl CarouselError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}
