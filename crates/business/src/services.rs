//! Service context shared by business operations
//!
//! Holds the database handle; services borrow it per request.

use biopass_persistence::Database;
use sqlx::SqlitePool;

/// Context for business operations - contains database access
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pool: SqlitePool,
}

impl ServiceContext {
    /// Create new service context from database
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Create from a pool directly
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
