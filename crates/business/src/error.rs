//! Business layer errors
//!
//! Uses anyhow for error aggregation with custom error types. The HTTP
//! layer downcasts to `BusinessError` to pick a status code, so the
//! variants group into the validation / conflict / not-found / storage
//! classes it cares about.

use biopass_core::{CoreError, FingerprintId};
use biopass_persistence::PersistenceError;
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    // === Conflict errors ===
    #[error("Fingerprint ID already registered: {0}")]
    AlreadyBound(FingerprintId),

    #[error("Enrollment request already exists for fingerprint ID: {0}")]
    AlreadyPending(FingerprintId),

    #[error("Roll number already registered: {0}")]
    DuplicateRollNumber(String),

    // === Not found errors ===
    #[error("Student not found: {0}")]
    StudentNotFound(FingerprintId),

    // === Wrapped errors ===
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("{0}")]
    Core(#[from] CoreError),
}

/// Result type alias for business operations
pub type BusinessResult<T> = anyhow::Result<T>;

impl BusinessError {
    /// Input rejected before touching storage
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Core(CoreError::OutOfRange(_)))
    }

    /// Uniqueness conflict, resolved in favor of an earlier writer
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyBound(_) | Self::AlreadyPending(_) | Self::DuplicateRollNumber(_)
        )
    }

    /// Referenced entity absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StudentNotFound(_))
    }
}
