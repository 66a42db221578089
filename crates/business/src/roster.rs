//! Roster queries and administrative edits
//!
//! Thin projections of the identity store and event log, plus the two
//! administrative operations (update, delete). No invariants beyond the
//! identifier and roll-number uniqueness the storage layer enforces.

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use anyhow::Context;
use biopass_core::{AttendanceEvent, FingerprintId, Student, StudentUpdate};
use biopass_persistence::{AttendanceRepo, PersistenceError, StudentRepo};

/// Read-only roster surface and administrative edits
pub struct RosterService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RosterService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// All registered students
    pub async fn list_students(&self) -> BusinessResult<Vec<Student>> {
        let rows = StudentRepo::get_all(self.ctx.pool())
            .await
            .context("Failed to list students")?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(anyhow::Error::from))
            .collect()
    }

    /// Attendance events, newest first, optionally for one slot
    pub async fn list_events(
        &self,
        slot: Option<FingerprintId>,
    ) -> BusinessResult<Vec<AttendanceEvent>> {
        let rows = match slot {
            Some(slot) => AttendanceRepo::list_by_slot(self.ctx.pool(), slot).await,
            None => AttendanceRepo::list_all(self.ctx.pool()).await,
        }
        .context("Failed to list attendance events")?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(anyhow::Error::from))
            .collect()
    }

    /// Delete a student record. Deleting an absent record succeeds.
    pub async fn delete_student(&self, slot: FingerprintId) -> BusinessResult<()> {
        StudentRepo::delete(self.ctx.pool(), slot)
            .await
            .context("Failed to delete student")?;
        tracing::info!(fingerprint_id = %slot, "student deleted");
        Ok(())
    }

    /// Apply a partial update; the fingerprint binding stays immutable.
    pub async fn update_student(
        &self,
        slot: FingerprintId,
        update: StudentUpdate,
    ) -> BusinessResult<Student> {
        let row = StudentRepo::update(self.ctx.pool(), slot, &update)
            .await
            .map_err(|err| match err {
                PersistenceError::NotFound { .. } => {
                    anyhow::Error::from(BusinessError::StudentNotFound(slot))
                }
                e if e.violates_column("roll_number") => anyhow::Error::from(
                    BusinessError::DuplicateRollNumber(
                        update.roll_number.clone().unwrap_or_default(),
                    ),
                ),
                e => anyhow::Error::from(BusinessError::Persistence(e)),
            })?;
        Ok(row.into_domain()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrollment::EnrollmentService;
    use biopass_core::NewStudent;
    use biopass_persistence::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_ctx() -> ServiceContext {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        run_migrations(&pool).await.expect("migrations");
        ServiceContext::from_pool(pool)
    }

    fn slot(n: i64) -> FingerprintId {
        FingerprintId::new(n).unwrap()
    }

    async fn register(ctx: &ServiceContext, n: i64, roll: &str) {
        EnrollmentService::new(ctx)
            .finalize_enrollment(NewStudent {
                fingerprint_id: slot(n),
                name: format!("Student {}", n),
                roll_number: roll.to_string(),
                email: format!("s{}@example.com", n),
                mobile: "555-0100".to_string(),
                parent_name: "Parent".to_string(),
                parent_email: format!("p{}@example.com", n),
                address: "1 Main St".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_students() {
        let ctx = test_ctx().await;
        register(&ctx, 5, "R1").await;
        register(&ctx, 6, "R2").await;

        let students = RosterService::new(&ctx).list_students().await.unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].fingerprint_id.get(), 5);
    }

    #[tokio::test]
    async fn test_delete_absent_student_succeeds() {
        let ctx = test_ctx().await;
        let roster = RosterService::new(&ctx);

        roster.delete_student(slot(99)).await.unwrap();

        register(&ctx, 5, "R1").await;
        roster.delete_student(slot(5)).await.unwrap();
        assert!(roster.list_students().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_absent_student_is_not_found() {
        let ctx = test_ctx().await;
        let roster = RosterService::new(&ctx);

        let err = roster
            .update_student(slot(5), StudentUpdate::default())
            .await
            .unwrap_err();
        let business = err.downcast_ref::<BusinessError>().unwrap();
        assert!(business.is_not_found());
    }

    #[tokio::test]
    async fn test_update_changes_only_set_fields() {
        let ctx = test_ctx().await;
        register(&ctx, 5, "R1").await;

        let updated = RosterService::new(&ctx)
            .update_student(
                slot(5),
                StudentUpdate {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.roll_number, "R1");
    }
}
