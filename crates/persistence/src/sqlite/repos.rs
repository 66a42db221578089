//! Repository implementations for SQLite
//!
//! One unit-struct repo per table. The UNIQUE indexes declared in the
//! migration are the backstop for concurrent check-then-act callers:
//! whichever insert loses the race comes back as
//! `PersistenceError::UniqueViolation`.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use biopass_core::{AttendanceEvent, FingerprintId, PendingEnrollment, Student, StudentUpdate};
use sqlx::SqlitePool;

// ============================================================================
// Student Repository (identity store)
// ============================================================================

/// Repository for the `students` table
pub struct StudentRepo;

impl StudentRepo {
    /// Look up a student by fingerprint slot
    pub async fn find_by_slot(
        pool: &SqlitePool,
        slot: FingerprintId,
    ) -> PersistenceResult<Option<StudentRow>> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT * FROM students WHERE fingerprint_id = ?",
        )
        .bind(slot.as_i64())
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Look up a student by fingerprint slot, erroring when absent
    pub async fn get_by_slot(
        pool: &SqlitePool,
        slot: FingerprintId,
    ) -> PersistenceResult<StudentRow> {
        Self::find_by_slot(pool, slot)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Student", slot))
    }

    /// Look up a student by roll number
    pub async fn find_by_roll_number(
        pool: &SqlitePool,
        roll_number: &str,
    ) -> PersistenceResult<Option<StudentRow>> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT * FROM students WHERE roll_number = ?",
        )
        .bind(roll_number)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// All students, ordered by slot
    pub async fn get_all(pool: &SqlitePool) -> PersistenceResult<Vec<StudentRow>> {
        let rows = sqlx::query_as::<_, StudentRow>(
            "SELECT * FROM students ORDER BY fingerprint_id",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Insert a new student record
    pub async fn insert(pool: &SqlitePool, student: &Student) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO students
                (fingerprint_id, name, roll_number, email, mobile,
                 parent_name, parent_email, address, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(student.fingerprint_id.as_i64())
        .bind(&student.name)
        .bind(&student.roll_number)
        .bind(&student.email)
        .bind(&student.mobile)
        .bind(&student.parent_name)
        .bind(&student.parent_email)
        .bind(&student.address)
        .bind(student.created_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Apply a partial update; unset fields keep their stored value.
    ///
    /// Returns the refreshed row. The fingerprint binding is immutable.
    pub async fn update(
        pool: &SqlitePool,
        slot: FingerprintId,
        update: &StudentUpdate,
    ) -> PersistenceResult<StudentRow> {
        let result = sqlx::query(
            r#"
            UPDATE students SET
                name = COALESCE(?, name),
                roll_number = COALESCE(?, roll_number),
                email = COALESCE(?, email),
                mobile = COALESCE(?, mobile),
                parent_name = COALESCE(?, parent_name),
                parent_email = COALESCE(?, parent_email),
                address = COALESCE(?, address)
            WHERE fingerprint_id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.roll_number)
        .bind(&update.email)
        .bind(&update.mobile)
        .bind(&update.parent_name)
        .bind(&update.parent_email)
        .bind(&update.address)
        .bind(slot.as_i64())
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Student", slot));
        }
        Self::get_by_slot(pool, slot).await
    }

    /// Delete by slot. Returns the number of rows removed; deleting an
    /// absent record is not an error.
    pub async fn delete(pool: &SqlitePool, slot: FingerprintId) -> PersistenceResult<u64> {
        let result = sqlx::query("DELETE FROM students WHERE fingerprint_id = ?")
            .bind(slot.as_i64())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// ============================================================================
// Attendance Repository (event log)
// ============================================================================

/// Repository for the `attendance_events` table
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Append one event. Events are never updated or deleted.
    pub async fn insert(pool: &SqlitePool, event: &AttendanceEvent) -> PersistenceResult<()> {
        sqlx::query(
            "INSERT INTO attendance_events (fingerprint_id, timestamp, status) VALUES (?, ?, ?)",
        )
        .bind(event.fingerprint_id.as_i64())
        .bind(event.timestamp)
        .bind(event.status.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Events for one slot, newest first
    pub async fn list_by_slot(
        pool: &SqlitePool,
        slot: FingerprintId,
    ) -> PersistenceResult<Vec<AttendanceEventRow>> {
        let rows = sqlx::query_as::<_, AttendanceEventRow>(
            "SELECT * FROM attendance_events WHERE fingerprint_id = ? \
             ORDER BY timestamp DESC, id DESC",
        )
        .bind(slot.as_i64())
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// All events, newest first
    pub async fn list_all(pool: &SqlitePool) -> PersistenceResult<Vec<AttendanceEventRow>> {
        let rows = sqlx::query_as::<_, AttendanceEventRow>(
            "SELECT * FROM attendance_events ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Count events for one slot
    pub async fn count_for_slot(
        pool: &SqlitePool,
        slot: FingerprintId,
    ) -> PersistenceResult<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM attendance_events WHERE fingerprint_id = ?",
        )
        .bind(slot.as_i64())
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Enrollment Repository (pending queue)
// ============================================================================

/// Repository for the `pending_enrollments` table
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Queue a new pending request. A request already queued for the same
    /// slot fails the UNIQUE index and surfaces as `UniqueViolation`.
    pub async fn insert(
        pool: &SqlitePool,
        pending: &PendingEnrollment,
    ) -> PersistenceResult<()> {
        sqlx::query(
            "INSERT INTO pending_enrollments (fingerprint_id, requested_at) VALUES (?, ?)",
        )
        .bind(pending.fingerprint_id.as_i64())
        .bind(pending.requested_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Is a request queued for this slot?
    pub async fn exists(pool: &SqlitePool, slot: FingerprintId) -> PersistenceResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM pending_enrollments WHERE fingerprint_id = ?",
        )
        .bind(slot.as_i64())
        .fetch_optional(pool)
        .await?;
        Ok(row.is_some())
    }

    /// Atomically remove and return the oldest pending request.
    ///
    /// Read-and-delete is one statement, so two concurrent claimers can
    /// never both receive the same slot; ties on `requested_at` break by
    /// insertion order. Returns `None` when the queue is empty.
    pub async fn claim_oldest(
        pool: &SqlitePool,
    ) -> PersistenceResult<Option<PendingEnrollmentRow>> {
        let row = sqlx::query_as::<_, PendingEnrollmentRow>(
            r#"
            DELETE FROM pending_enrollments
            WHERE id = (
                SELECT id FROM pending_enrollments
                ORDER BY requested_at ASC, id ASC
                LIMIT 1
            )
            RETURNING id, fingerprint_id, requested_at
            "#,
        )
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Count queued requests
    pub async fn count(pool: &SqlitePool) -> PersistenceResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pending_enrollments")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Open a connection pool without running migrations
pub async fn create_pool(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = SqlitePool::connect(database_url).await?;
    Ok(pool)
}

/// Run migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Create the database if missing and bring the schema up to date
pub async fn init_database(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = SqlitePool::connect_with(
        database_url
            .parse::<sqlx::sqlite::SqliteConnectOptions>()?
            .create_if_missing(true),
    )
    .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use biopass_core::{AttendanceStatus, NewStudent};
    use chrono::{Duration, Utc};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        run_migrations(&pool).await.expect("migrations");
        pool
    }

    fn slot(n: i64) -> FingerprintId {
        FingerprintId::new(n).unwrap()
    }

    fn sample_student(n: i64, roll: &str) -> Student {
        NewStudent {
            fingerprint_id: slot(n),
            name: format!("Student {}", n),
            roll_number: roll.to_string(),
            email: format!("s{}@example.com", n),
            mobile: "555-0100".to_string(),
            parent_name: "Parent".to_string(),
            parent_email: format!("p{}@example.com", n),
            address: "1 Main St".to_string(),
        }
        .into_student()
    }

    #[tokio::test]
    async fn test_student_insert_and_lookup() {
        let pool = test_pool().await;
        StudentRepo::insert(&pool, &sample_student(5, "R1"))
            .await
            .unwrap();

        let row = StudentRepo::find_by_slot(&pool, slot(5)).await.unwrap();
        assert_eq!(row.unwrap().roll_number, "R1");

        assert!(StudentRepo::find_by_slot(&pool, slot(6))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slot_is_unique_violation() {
        let pool = test_pool().await;
        StudentRepo::insert(&pool, &sample_student(5, "R1"))
            .await
            .unwrap();

        let err = StudentRepo::insert(&pool, &sample_student(5, "R2"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert!(err.violates_column("fingerprint_id"));
    }

    #[tokio::test]
    async fn test_duplicate_roll_number_is_unique_violation() {
        let pool = test_pool().await;
        StudentRepo::insert(&pool, &sample_student(5, "R1"))
            .await
            .unwrap();

        let err = StudentRepo::insert(&pool, &sample_student(6, "R1"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert!(err.violates_column("roll_number"));
    }

    #[tokio::test]
    async fn test_update_applies_only_set_fields() {
        let pool = test_pool().await;
        StudentRepo::insert(&pool, &sample_student(5, "R1"))
            .await
            .unwrap();

        let update = StudentUpdate {
            mobile: Some("555-0199".to_string()),
            ..Default::default()
        };
        let row = StudentRepo::update(&pool, slot(5), &update).await.unwrap();
        assert_eq!(row.mobile, "555-0199");
        assert_eq!(row.roll_number, "R1");

        let err = StudentRepo::update(&pool, slot(9), &update)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_an_error() {
        let pool = test_pool().await;
        StudentRepo::insert(&pool, &sample_student(5, "R1"))
            .await
            .unwrap();

        assert_eq!(StudentRepo::delete(&pool, slot(5)).await.unwrap(), 1);
        assert_eq!(StudentRepo::delete(&pool, slot(5)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_attendance_listing_is_newest_first() {
        let pool = test_pool().await;
        let base = Utc::now();
        for i in 0..3 {
            let event = AttendanceEvent {
                fingerprint_id: slot(5),
                timestamp: base + Duration::seconds(i),
                status: AttendanceStatus::Entry,
            };
            AttendanceRepo::insert(&pool, &event).await.unwrap();
        }

        let rows = AttendanceRepo::list_by_slot(&pool, slot(5)).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

        let all = AttendanceRepo::list_all(&pool).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_claim_drains_fifo() {
        let pool = test_pool().await;
        let base = Utc::now();
        for (i, n) in [7, 3, 9].iter().enumerate() {
            let pending = PendingEnrollment {
                fingerprint_id: slot(*n),
                requested_at: base + Duration::seconds(i as i64),
            };
            EnrollmentRepo::insert(&pool, &pending).await.unwrap();
        }

        // Oldest request first, regardless of slot number
        let first = EnrollmentRepo::claim_oldest(&pool).await.unwrap().unwrap();
        assert_eq!(first.fingerprint_id, 7);
        let second = EnrollmentRepo::claim_oldest(&pool).await.unwrap().unwrap();
        assert_eq!(second.fingerprint_id, 3);
        let third = EnrollmentRepo::claim_oldest(&pool).await.unwrap().unwrap();
        assert_eq!(third.fingerprint_id, 9);

        assert!(EnrollmentRepo::claim_oldest(&pool).await.unwrap().is_none());
        assert_eq!(EnrollmentRepo::count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_claim_ties_break_by_insertion_order() {
        let pool = test_pool().await;
        let at = Utc::now();
        for n in [4, 2, 8] {
            let pending = PendingEnrollment {
                fingerprint_id: slot(n),
                requested_at: at,
            };
            EnrollmentRepo::insert(&pool, &pending).await.unwrap();
        }

        let first = EnrollmentRepo::claim_oldest(&pool).await.unwrap().unwrap();
        assert_eq!(first.fingerprint_id, 4);
    }

    #[tokio::test]
    async fn test_pending_slot_is_unique() {
        let pool = test_pool().await;
        let pending = PendingEnrollment::new(slot(5));
        EnrollmentRepo::insert(&pool, &pending).await.unwrap();
        assert!(EnrollmentRepo::exists(&pool, slot(5)).await.unwrap());

        let err = EnrollmentRepo::insert(&pool, &PendingEnrollment::new(slot(5)))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }
}
