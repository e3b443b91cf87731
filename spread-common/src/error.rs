//! Error types shared by the spread pipeline crates.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias using the shared error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type.
///
/// Per-symbol data gaps never surface here; they are absorbed by the stage
/// that observes them. What remains is fatal to a run.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this error comes from configuration loading or validation.
    pub fn is_config(&self) -> bool {
        match self {
            Self::Config(_) | Self::Validation(_) => true,
            Self::WithContext { source, .. } => source.is_config(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_config_errors() {
        let err: Error = ValidationError::MissingField {
            field: "constraints.nav".into(),
        }
        .into();
        assert!(err.is_config());
        assert!(err.with_context("loading constraints").is_config());
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::Json(serde_json::from_str::<u32>("x").unwrap_err());
        let with_ctx = err.with_context("starting run");
        assert!(matches!(with_ctx, Error::WithContext { .. }));
        assert!(!with_ctx.is_config());
        assert!(with_ctx.to_string().starts_with("starting run"));
    }
}
