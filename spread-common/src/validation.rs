//! Configuration validation.
//!
//! Configuration errors are the only fatal condition of a pipeline run, so
//! every section is checked up front and all problems are reported together.

use thiserror::Error;

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Shorthand for an `InvalidValue` error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

/// Collects validation errors across sections.
#[derive(Debug, Default)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed check.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record the outcome of a fallible check, passing through its value.
    pub fn check<T>(&mut self, result: ValidationResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(ValidationError::Multiple(inner)) => {
                self.errors.extend(inner);
                None
            }
            Err(other) => {
                self.errors.push(other);
                None
            }
        }
    }

    /// Record an `InvalidValue` error when `condition` does not hold.
    pub fn require(&mut self, condition: bool, field: &str, reason: &str) {
        if !condition {
            self.push(ValidationError::invalid(field, reason));
        }
    }

    /// Collapse into a single result.
    pub fn finish(mut self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else if self.errors.len() == 1 {
            Err(self.errors.remove(0))
        } else {
            Err(ValidationError::Multiple(self.errors))
        }
    }
}

/// Validate a log level / format pair.
pub fn validate_observability(log_level: &str, log_format: &str) -> ValidationResult<()> {
    let mut report = ValidationReport::new();

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&log_level.to_lowercase().as_str()) {
        report.push(ValidationError::invalid(
            "observability.log_level",
            format!("must be one of: {}", valid_levels.join(", ")),
        ));
    }

    let valid_formats = ["json", "compact", "pretty"];
    if !valid_formats.contains(&log_format.to_lowercase().as_str()) {
        report.push(ValidationError::invalid(
            "observability.log_format",
            format!("must be one of: {}", valid_formats.join(", ")),
        ));
    }

    report.finish()
}

impl Validate for crate::config::ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        validate_observability(&self.log_level, &self.log_format)
    }
}
