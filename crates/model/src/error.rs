use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while constructing model values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The raw key cannot be canonicalized into a unit id
    #[error("Invalid identifier '{raw}': {reason}")]
    InvalidIdentifier { raw: String, reason: String },
}

impl ModelError {
    /// Create an invalid identifier error
    pub fn invalid_identifier(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}
