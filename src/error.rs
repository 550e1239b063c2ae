//! Store Errors
//!
//! TigerStyle: Every failure is typed and scoped to the single operation
//! that produced it. Nothing here is retried or recovered inside a store;
//! the HTTP layer decides how each variant is presented.

/// Failures returned by the user and post stores
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A required field is missing/blank, or input is structurally invalid
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// A uniqueness constraint (user email) would be violated
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// A referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Duplicate(_) => "duplicate_error",
            Self::NotFound(_) => "not_found_error",
        }
    }

    /// Human-readable message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. } => message.as_str(),
            Self::Duplicate(message) | Self::NotFound(message) => message.as_str(),
        }
    }
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Returns the value if it is present and not blank (whitespace only counts as blank)
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Requires a present, non-blank string field
pub(crate) fn require_non_blank<'a>(
    value: Option<&'a str>,
    field: &str,
    message: &str,
) -> StoreResult<&'a str> {
    non_blank(value).ok_or_else(|| StoreError::validation(field, message))
}
