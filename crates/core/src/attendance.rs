//! # Attendance Module
//!
//! `AttendanceEvent` - one presence record per accepted scan. Events are
//! append-only and immutable; rejected scans never produce an event.

use crate::error::{CoreError, CoreResult};
use crate::fingerprint::FingerprintId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a presence event.
///
/// Every live scan is recorded as `Entry`; `Exit` exists in the data
/// model but nothing in the admission path produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Entry,
    Exit,
}

impl AttendanceStatus {
    /// Code string for the DB
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Entry => "entry",
            AttendanceStatus::Exit => "exit",
        }
    }

    /// Parse from the DB code string
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "entry" => Ok(AttendanceStatus::Entry),
            "exit" => Ok(AttendanceStatus::Exit),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded presence event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    /// Slot that was scanned
    pub fingerprint_id: FingerprintId,
    /// When the scan was accepted
    pub timestamp: DateTime<Utc>,
    /// Direction of the event
    pub status: AttendanceStatus,
}

impl AttendanceEvent {
    /// New entry event stamped now.
    pub fn entry_now(fingerprint_id: FingerprintId) -> Self {
        AttendanceEvent {
            fingerprint_id,
            timestamp: Utc::now(),
            status: AttendanceStatus::Entry,
        }
    }
}
