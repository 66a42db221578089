//! # Fingerprint Module
//!
//! `FingerprintId` - the slot number the scanning hardware assigns to a
//! stored biometric template. The sensor holds 127 templates, so valid
//! slots are 1..=127. Construction is the single place where the range is
//! validated; everything downstream can rely on a `FingerprintId` being
//! in range.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated sensor slot number in `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintId(u8);

impl FingerprintId {
    /// Lowest slot the sensor assigns
    pub const MIN: u8 = 1;
    /// Highest slot the sensor assigns
    pub const MAX: u8 = 127;

    /// Validate a raw slot number.
    ///
    /// Fails with `CoreError::OutOfRange` for anything outside `1..=127`.
    pub fn new(raw: i64) -> CoreResult<Self> {
        if raw < Self::MIN as i64 || raw > Self::MAX as i64 {
            return Err(CoreError::OutOfRange(raw));
        }
        Ok(FingerprintId(raw as u8))
    }

    /// Raw slot value
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Slot value widened for database binding
    pub fn as_i64(&self) -> i64 {
        self.0 as i64
    }
}

impl TryFrom<i64> for FingerprintId {
    type Error = CoreError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        FingerprintId::new(raw)
    }
}

impl fmt::Display for FingerprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_full_range() {
        assert_eq!(FingerprintId::new(1).unwrap().get(), 1);
        assert_eq!(FingerprintId::new(64).unwrap().get(), 64);
        assert_eq!(FingerprintId::new(127).unwrap().get(), 127);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(FingerprintId::new(0).is_err());
        assert!(FingerprintId::new(128).is_err());
        assert!(FingerprintId::new(-5).is_err());
        assert!(FingerprintId::new(i64::MAX).is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id = FingerprintId::new(42).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: FingerprintId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(FingerprintId::new(7).unwrap().to_string(), "7");
    }
}
