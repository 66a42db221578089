//! # Biopass Persistence
//!
//! Persistence layer for Biopass - SQLite via sqlx.
//!
//! Three tables back the three stores the attendance flow needs:
//!
//! ```text
//! students            - identity store (fingerprint slot -> record)
//! attendance_events   - append-only event log
//! pending_enrollments - enrollment queue, drained oldest-first
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use biopass_persistence::{Database, StudentRepo};
//!
//! let db = Database::open("sqlite:biopass.db").await?;
//! let students = StudentRepo::get_all(db.pool()).await?;
//! ```

pub mod error;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::{
    create_pool, init_database, run_migrations, AttendanceRepo, EnrollmentRepo, StudentRepo,
};
pub use sqlite::schema::{AttendanceEventRow, PendingEnrollmentRow, StudentRow};

use sqlx::SqlitePool;

/// Database facade - owns the pool, ensures the schema exists.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) and migrate a SQLite database.
    ///
    /// `database_url` is a sqlx SQLite URL, e.g. `sqlite:data/biopass.db`.
    pub async fn open(database_url: &str) -> PersistenceResult<Self> {
        let pool = init_database(database_url).await?;
        Ok(Database { pool })
    }

    /// Wrap an existing pool, running migrations on it.
    pub async fn from_pool(pool: SqlitePool) -> PersistenceResult<Self> {
        run_migrations(&pool).await?;
        Ok(Database { pool })
    }

    /// Connection pool handle
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
