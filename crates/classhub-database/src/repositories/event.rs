//! Event log repository implementation.
//!
//! The `events` table is append-only: this repository exposes no update or
//! delete operations by design.

use sqlx::PgPool;
use uuid::Uuid;

use classhub_core::error::{AppError, ErrorKind};
use classhub_core::result::AppResult;
use classhub_entity::event::{EventKind, EventRecord, NewEvent};

/// Optional filters for kind-scoped event queries.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Restrict to a classroom.
    pub classroom_id: Option<Uuid>,
    /// Restrict to a targeted user.
    pub target_user_id: Option<Uuid>,
}

/// Repository for the append-only domain event log.
#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an event. `created_at` is stamped by the database.
    pub async fn append(&self, event: &NewEvent) -> AppResult<EventRecord> {
        sqlx::query_as::<_, EventRecord>(
            "INSERT INTO events (kind, actor_id, target_user_id, classroom_id, assignment_id, announcement_id, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(event.kind)
        .bind(event.actor_id)
        .bind(event.target_user_id)
        .bind(event.classroom_id)
        .bind(event.assignment_id)
        .bind(event.announcement_id)
        .bind(&event.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append event", e))
    }

    /// List events for a classroom, newest-first.
    pub async fn find_by_classroom(
        &self,
        classroom_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<EventRecord>> {
        sqlx::query_as::<_, EventRecord>(
            "SELECT * FROM events WHERE classroom_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(classroom_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list classroom events", e)
        })
    }

    /// List events involving a user (as actor or target), newest-first.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<EventRecord>> {
        sqlx::query_as::<_, EventRecord>(
            "SELECT * FROM events WHERE actor_id = $1 OR target_user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user events", e))
    }

    /// List events of a given kind with optional filters, newest-first.
    pub async fn find_by_kind(
        &self,
        kind: EventKind,
        filter: &EventFilter,
        limit: i64,
    ) -> AppResult<Vec<EventRecord>> {
        sqlx::query_as::<_, EventRecord>(
            "SELECT * FROM events WHERE kind = $1 \
             AND ($2::uuid IS NULL OR classroom_id = $2) \
             AND ($3::uuid IS NULL OR target_user_id = $3) \
             ORDER BY created_at DESC, id DESC LIMIT $4",
        )
        .bind(kind)
        .bind(filter.classroom_id)
        .bind(filter.target_user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list events by kind", e)
        })
    }
}
