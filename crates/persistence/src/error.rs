//! # Persistence Errors
//!
//! Error types for the persistence layer, wrapping sqlx errors. Unique
//! constraint violations get their own variant so the business layer can
//! map a lost insert race to a conflict instead of a server error.

use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    // === Conversion errors ===
    #[error("Stored value out of domain: {field} = {value}")]
    InvalidStoredValue { field: String, value: String },
}

/// Result type alias for PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.kind() == sqlx::error::ErrorKind::UniqueViolation {
                return PersistenceError::UniqueViolation(db_err.message().to_string());
            }
        }
        PersistenceError::Database(err)
    }
}

impl PersistenceError {
    /// Create NotFound error
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Check for not-found
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check for a unique constraint violation
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Which column a unique violation names, if any.
    ///
    /// SQLite reports the failed constraint as `table.column` in the
    /// error message; this is what lets a racing finalize distinguish a
    /// duplicate slot from a duplicate roll number.
    pub fn violates_column(&self, column: &str) -> bool {
        match self {
            Self::UniqueViolation(msg) => msg.contains(column),
            _ => false,
        }
    }
}
