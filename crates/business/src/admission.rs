//! Admission controller - the per-scan decision
//!
//! Every live scan lands here: unknown slots are denied and leave no
//! trace in the event log; known slots get exactly one entry event and a
//! guardian notification dispatched on a detached task. Notification
//! failure never turns a successful admission into a failure.

use crate::error::BusinessResult;
use crate::notify::{spawn_attendance_notification, Notifier};
use crate::services::ServiceContext;
use anyhow::Context;
use biopass_core::{AttendanceEvent, FingerprintId, Student};
use biopass_persistence::{AttendanceRepo, StudentRepo};
use std::sync::Arc;

/// Outcome of an admission decision
#[derive(Debug, Clone)]
pub enum Admission {
    /// Slot resolves to a student; event recorded, notification dispatched
    Granted(Student),
    /// Slot unknown; nothing recorded
    Denied,
}

impl Admission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Admission::Granted(_))
    }
}

/// Admission Controller - known-vs-unknown plus record-and-notify
pub struct AdmissionService<'a> {
    ctx: &'a ServiceContext,
    notifier: Arc<dyn Notifier>,
}

impl<'a> AdmissionService<'a> {
    pub fn new(ctx: &'a ServiceContext, notifier: Arc<dyn Notifier>) -> Self {
        Self { ctx, notifier }
    }

    /// Decide one scan event.
    ///
    /// Out-of-range slots cannot be bound to anyone, so they are denied
    /// like any other unknown slot rather than treated as bad input -
    /// the scanner is a trusted device, not a client to correct. Every
    /// accepted scan records a fresh `entry` event; there is no
    /// entry/exit toggle.
    pub async fn admit(&self, raw_slot: i64) -> BusinessResult<Admission> {
        let slot = match FingerprintId::new(raw_slot) {
            Ok(slot) => slot,
            Err(_) => {
                tracing::warn!(raw_slot, "scan with out-of-range fingerprint ID denied");
                return Ok(Admission::Denied);
            }
        };

        let row = StudentRepo::find_by_slot(self.ctx.pool(), slot)
            .await
            .context("Failed to look up student for admission")?;

        let student = match row {
            Some(row) => row.into_domain()?,
            None => {
                tracing::info!(fingerprint_id = %slot, "unregistered fingerprint denied");
                return Ok(Admission::Denied);
            }
        };

        let event = AttendanceEvent::entry_now(slot);
        AttendanceRepo::insert(self.ctx.pool(), &event)
            .await
            .context("Failed to record attendance event")?;

        spawn_attendance_notification(self.notifier.clone(), student.clone(), event.timestamp);

        tracing::info!(fingerprint_id = %slot, "attendance marked");
        Ok(Admission::Granted(student))
    }
}
