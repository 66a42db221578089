//! Enrollment coordinator - the handshake with the scanner agent
//!
//! Enrollment is a two-step protocol decoupled in time: an operator
//! queues a request for a slot, the polling scanner agent claims the
//! oldest request (claim and removal are one atomic step, so a slot is
//! handed out at most once), and a later call finalizes the student
//! record. Finalize deliberately does not require a prior claim: the
//! queue entry is already gone by then, and direct registration is
//! accepted.

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use anyhow::Context;
use biopass_core::{FingerprintId, NewStudent, PendingEnrollment, Student};
use biopass_persistence::{EnrollmentRepo, StudentRepo};

/// Enrollment Coordinator - request / claim / finalize
pub struct EnrollmentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EnrollmentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Queue an enrollment request for a raw slot number.
    ///
    /// Rejects out-of-range slots before touching storage, slots already
    /// bound to a student, and slots already queued. A concurrent
    /// duplicate request loses on the queue's UNIQUE index and gets the
    /// same already-pending error as the sequential case.
    pub async fn request_enrollment(&self, raw_slot: i64) -> BusinessResult<FingerprintId> {
        let slot = FingerprintId::new(raw_slot).map_err(BusinessError::Core)?;
        let pool = self.ctx.pool();

        if StudentRepo::find_by_slot(pool, slot)
            .await
            .context("Failed to check students for enrollment request")?
            .is_some()
        {
            return Err(BusinessError::AlreadyBound(slot).into());
        }

        if EnrollmentRepo::exists(pool, slot)
            .await
            .context("Failed to check pending enrollments")?
        {
            return Err(BusinessError::AlreadyPending(slot).into());
        }

        let pending = PendingEnrollment::new(slot);
        EnrollmentRepo::insert(pool, &pending)
            .await
            .map_err(|err| match err {
                e if e.is_unique_violation() => {
                    anyhow::Error::from(BusinessError::AlreadyPending(slot))
                }
                e => anyhow::Error::from(BusinessError::Persistence(e)),
            })?;

        tracing::info!(fingerprint_id = %slot, "enrollment request queued");
        Ok(slot)
    }

    /// Hand the oldest pending request to the scanner agent.
    ///
    /// Removes the entry in the same statement that reads it; at most
    /// one caller ever receives a given slot. `None` means the queue is
    /// empty. An abandoned claim is not retried or re-queued.
    pub async fn claim_oldest_pending(&self) -> BusinessResult<Option<FingerprintId>> {
        let claimed = EnrollmentRepo::claim_oldest(self.ctx.pool())
            .await
            .context("Failed to claim pending enrollment")?;

        match claimed {
            Some(row) => {
                let pending = row.into_domain()?;
                tracing::info!(
                    fingerprint_id = %pending.fingerprint_id,
                    "pending enrollment handed to scanner"
                );
                Ok(Some(pending.fingerprint_id))
            }
            None => Ok(None),
        }
    }

    /// Finalize an enrollment into a student record.
    ///
    /// No pending entry is required - the claim already removed it, and
    /// direct registration is accepted. Identifier and roll-number
    /// uniqueness are checked here and backstopped by the table's UNIQUE
    /// constraints, so a concurrent finalize race has exactly one winner.
    pub async fn finalize_enrollment(&self, new_student: NewStudent) -> BusinessResult<Student> {
        let pool = self.ctx.pool();
        let slot = new_student.fingerprint_id;

        if StudentRepo::find_by_slot(pool, slot)
            .await
            .context("Failed to check students for registration")?
            .is_some()
        {
            return Err(BusinessError::AlreadyBound(slot).into());
        }

        if StudentRepo::find_by_roll_number(pool, &new_student.roll_number)
            .await
            .context("Failed to check roll numbers for registration")?
            .is_some()
        {
            return Err(BusinessError::DuplicateRollNumber(new_student.roll_number).into());
        }

        let student = new_student.into_student();
        StudentRepo::insert(pool, &student)
            .await
            .map_err(|err| match err {
                e if e.violates_column("roll_number") => anyhow::Error::from(
                    BusinessError::DuplicateRollNumber(student.roll_number.clone()),
                ),
                e if e.is_unique_violation() => {
                    anyhow::Error::from(BusinessError::AlreadyBound(slot))
                }
                e => anyhow::Error::from(BusinessError::Persistence(e)),
            })?;

        tracing::info!(fingerprint_id = %slot, "student registered");
        Ok(student)
    }
}
