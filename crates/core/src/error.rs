//! # Error Module
//!
//! Domain errors for Biopass core types, using thiserror.

use thiserror::Error;

/// Core domain errors.
///
/// Validation failures detected before any storage is touched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Fingerprint slot outside the sensor's supported range
    #[error("Fingerprint ID out of range: {0} (valid range is 1..=127)")]
    OutOfRange(i64),

    /// Attendance status string not recognized
    #[error("Invalid attendance status: {0}")]
    InvalidStatus(String),
}

/// Result type alias with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Check whether this is a range validation error
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, CoreError::OutOfRange(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::OutOfRange(300);
        assert_eq!(
            err.to_string(),
            "Fingerprint ID out of range: 300 (valid range is 1..=127)"
        );

        let err = CoreError::InvalidStatus("lunch".to_string());
        assert_eq!(err.to_string(), "Invalid attendance status: lunch");
    }

    #[test]
    fn test_error_checks() {
        assert!(CoreError::OutOfRange(0).is_out_of_range());
        assert!(!CoreError::InvalidStatus("x".to_string()).is_out_of_range());
    }
}
