//! # Student Module
//!
//! `Student` is the identity record bound to a fingerprint slot. Records
//! are created only through enrollment finalization (or direct
//! registration); the slot binding is immutable for the life of the
//! record, while the remaining fields are plain administrative data.

use crate::fingerprint::FingerprintId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity record bound to a fingerprint slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Sensor slot owning this record (unique, immutable once bound)
    pub fingerprint_id: FingerprintId,
    /// Display name
    pub name: String,
    /// School roll number (unique across all students)
    pub roll_number: String,
    /// Student's own email
    pub email: String,
    /// Contact phone number
    pub mobile: String,
    /// Guardian name, used in notifications
    pub parent_name: String,
    /// Guardian email, the notification address
    pub parent_email: String,
    /// Postal address
    pub address: String,
    /// When the record was finalized
    pub created_at: DateTime<Utc>,
}

/// Field set required to finalize an enrollment into a `Student`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub fingerprint_id: FingerprintId,
    pub name: String,
    pub roll_number: String,
    pub email: String,
    pub mobile: String,
    pub parent_name: String,
    pub parent_email: String,
    pub address: String,
}

impl NewStudent {
    /// Build the full record with `created_at` stamped now.
    pub fn into_student(self) -> Student {
        Student {
            fingerprint_id: self.fingerprint_id,
            name: self.name,
            roll_number: self.roll_number,
            email: self.email,
            mobile: self.mobile,
            parent_name: self.parent_name,
            parent_email: self.parent_email,
            address: self.address,
            created_at: Utc::now(),
        }
    }
}

/// Partial update for administrative edits.
///
/// `None` fields keep their stored value. The fingerprint binding and the
/// creation time are not updatable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub roll_number: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub parent_name: Option<String>,
    pub parent_email: Option<String>,
    pub address: Option<String>,
}

impl StudentUpdate {
    /// True when no field is set (the update is a no-op).
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.roll_number.is_none()
            && self.email.is_none()
            && self.mobile.is_none()
            && self.parent_name.is_none()
            && self.parent_email.is_none()
            && self.address.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new_student() -> NewStudent {
        NewStudent {
            fingerprint_id: FingerprintId::new(5).unwrap(),
            name: "Alice".to_string(),
            roll_number: "R1".to_string(),
            email: "alice@example.com".to_string(),
            mobile: "555-0100".to_string(),
            parent_name: "Bob".to_string(),
            parent_email: "bob@example.com".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    #[test]
    fn test_into_student_stamps_creation_time() {
        let before = Utc::now();
        let student = sample_new_student().into_student();
        assert!(student.created_at >= before);
        assert_eq!(student.fingerprint_id.get(), 5);
        assert_eq!(student.roll_number, "R1");
    }

    #[test]
    fn test_update_is_empty() {
        assert!(StudentUpdate::default().is_empty());

        let update = StudentUpdate {
            mobile: Some("555-0199".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
