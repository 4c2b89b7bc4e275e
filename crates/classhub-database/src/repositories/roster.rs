//! SQL-backed roster provider.
//!
//! Membership rows are owned by the classroom subsystem; this repository
//! only reads them to resolve fan-out recipients.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use classhub_core::error::{AppError, ErrorKind};
use classhub_core::result::AppResult;
use classhub_core::traits::roster::RosterProvider;

/// Reads classroom rosters from the `classroom_members` table.
#[derive(Debug, Clone)]
pub struct SqlRosterProvider {
    pool: PgPool,
}

impl SqlRosterProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterProvider for SqlRosterProvider {
    /// Current students of a classroom. A classroom with no rows (deleted
    /// or never existed) yields an empty roster.
    async fn roster(&self, classroom_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar(
            "SELECT user_id FROM classroom_members \
             WHERE classroom_id = $1 AND role = 'student' \
             ORDER BY joined_at ASC",
        )
        .bind(classroom_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load roster", e))
    }
}
