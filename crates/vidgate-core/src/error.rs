use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("Invalid VID format '{input}': {reason}")]
    InvalidFormat { input: String, reason: String },
}

impl Error {
    /// Create a new invalid format error.
    pub fn invalid_format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
