//! # Biopass Core
//!
//! Core domain types for the Biopass attendance backend:
//! - `FingerprintId`: bounded sensor slot number
//! - `Student`: identity record bound to a fingerprint slot
//! - `AttendanceEvent`: append-only presence record
//! - `PendingEnrollment`: queued enrollment handshake request
//!
//! No I/O here; persistence and business rules live in their own crates.

pub mod attendance;
pub mod enrollment;
pub mod error;
pub mod fingerprint;
pub mod student;

pub use attendance::{AttendanceEvent, AttendanceStatus};
pub use enrollment::PendingEnrollment;
pub use error::{CoreError, CoreResult};
pub use fingerprint::FingerprintId;
pub use student::{NewStudent, Student, StudentUpdate};
