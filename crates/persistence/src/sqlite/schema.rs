//! Database schema definitions
//!
//! Row types for sqlx mapping from SQLite tables. The schema itself is
//! defined in migrations/20260830000000_init.sql. Rows hold raw column
//! values; `into_domain` converts to core types, validating on the way
//! out so corrupt rows surface as errors instead of panics.

use crate::error::{PersistenceError, PersistenceResult};
use biopass_core::{AttendanceEvent, AttendanceStatus, FingerprintId, PendingEnrollment, Student};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row type for the `students` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct StudentRow {
    pub fingerprint_id: i64,
    pub name: String,
    pub roll_number: String,
    pub email: String,
    pub mobile: String,
    pub parent_name: String,
    pub parent_email: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl StudentRow {
    /// Convert to the domain type, validating the stored slot.
    pub fn into_domain(self) -> PersistenceResult<Student> {
        let fingerprint_id = slot_from_row(self.fingerprint_id)?;
        Ok(Student {
            fingerprint_id,
            name: self.name,
            roll_number: self.roll_number,
            email: self.email,
            mobile: self.mobile,
            parent_name: self.parent_name,
            parent_email: self.parent_email,
            address: self.address,
            created_at: self.created_at,
        })
    }
}

/// Row type for the `attendance_events` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AttendanceEventRow {
    pub id: i64,
    pub fingerprint_id: i64,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

impl AttendanceEventRow {
    /// Convert to the domain type, validating slot and status.
    pub fn into_domain(self) -> PersistenceResult<AttendanceEvent> {
        let fingerprint_id = slot_from_row(self.fingerprint_id)?;
        let status = AttendanceStatus::parse(&self.status).map_err(|_| {
            PersistenceError::InvalidStoredValue {
                field: "attendance_events.status".to_string(),
                value: self.status,
            }
        })?;
        Ok(AttendanceEvent {
            fingerprint_id,
            timestamp: self.timestamp,
            status,
        })
    }
}

/// Row type for the `pending_enrollments` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct PendingEnrollmentRow {
    pub id: i64,
    pub fingerprint_id: i64,
    pub requested_at: DateTime<Utc>,
}

impl PendingEnrollmentRow {
    /// Convert to the domain type, validating the stored slot.
    pub fn into_domain(self) -> PersistenceResult<PendingEnrollment> {
        Ok(PendingEnrollment {
            fingerprint_id: slot_from_row(self.fingerprint_id)?,
            requested_at: self.requested_at,
        })
    }
}

/// Validate a slot read back from storage.
pub(crate) fn slot_from_row(raw: i64) -> PersistenceResult<FingerprintId> {
    FingerprintId::new(raw).map_err(|_| PersistenceError::InvalidStoredValue {
        field: "fingerprint_id".to_string(),
        value: raw.to_string(),
    })
}
