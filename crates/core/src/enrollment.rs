//! # Enrollment Module
//!
//! `PendingEnrollment` - a queued request to bind a fingerprint slot to a
//! not-yet-registered student. The entry lives from the moment an
//! operator requests enrollment until the scanner agent claims it; the
//! claim removes it in the same operation that reads it, so there is no
//! dispatched-but-unconfirmed state.

use crate::fingerprint::FingerprintId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A queued enrollment handshake request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEnrollment {
    /// Slot awaiting template capture (unique among pending requests)
    pub fingerprint_id: FingerprintId,
    /// When the request was queued; claims drain oldest-first
    pub requested_at: DateTime<Utc>,
}

impl PendingEnrollment {
    /// New request stamped now.
    pub fn new(fingerprint_id: FingerprintId) -> Self {
        PendingEnrollment {
            fingerprint_id,
            requested_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stamps_request_time() {
        let before = Utc::now();
        let pending = PendingEnrollment::new(FingerprintId::new(3).unwrap());
        assert!(pending.requested_at >= before);
        assert_eq!(pending.fingerprint_id.get(), 3);
    }
}
