use thiserror::Error;

/// Validation errors for canonical primitives.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a value is not a valid calendar date.
    #[error("{field} ('{value}') is not a valid calendar date")]
    InvalidDate {
        /// Field name that failed to parse.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}
