//! Event log query endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use classhub_core::error::AppError;
use classhub_core::types::pagination::PageRequest;
use classhub_database::repositories::event::EventFilter;
use classhub_entity::event::{EventKind, NewEvent};

use crate::extract::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AppendEventRequest {
    kind: EventKind,
    classroom_id: Option<Uuid>,
    target_user_id: Option<Uuid>,
    assignment_id: Option<Uuid>,
    announcement_id: Option<Uuid>,
    metadata: Option<serde_json::Value>,
}

/// `POST /api/events` — append a domain event and fan it out.
///
/// The caller becomes the actor. Fan-out failure does not undo the
/// append; the event is durable either way and the failure is reported.
pub async fn append(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<AppendEventRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let mut event = NewEvent::new(body.kind, user.user_id);
    event.classroom_id = body.classroom_id;
    event.target_user_id = body.target_user_id;
    event.assignment_id = body.assignment_id;
    event.announcement_id = body.announcement_id;
    event.metadata = body.metadata;

    let record = state.event_log.append(event).await?;
    let outcome = state.fanout.fan_out(&record).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "event": record,
            "notified": outcome.notifications.len(),
            "job_id": outcome.job_id,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl ListParams {
    fn page(&self) -> PageRequest {
        PageRequest::new(
            self.limit.unwrap_or(PageRequest::default().limit),
            self.offset.unwrap_or(0),
        )
    }
}

/// `GET /api/events/classroom/{id}` — classroom events, newest-first.
pub async fn list_for_classroom(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(classroom_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let events = state
        .event_log
        .list_for_classroom(classroom_id, params.page())
        .await?;
    Ok(Json(json!({ "events": events })))
}

#[derive(Debug, Deserialize)]
pub struct KindParams {
    classroom_id: Option<Uuid>,
    limit: Option<i64>,
}

/// `GET /api/events/kind/{kind}` — events of one kind, newest-first.
///
/// Defaults to events targeting the caller (mentions, grades, answers);
/// a `classroom_id` filter widens the scope to a whole classroom.
pub async fn list_by_kind(
    State(state): State<AppState>,
    user: AuthUser,
    Path(kind): Path<String>,
    Query(params): Query<KindParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let kind: EventKind = kind
        .parse()
        .map_err(|e: String| AppError::validation(e))?;
    let filter = match params.classroom_id {
        Some(classroom_id) => EventFilter {
            classroom_id: Some(classroom_id),
            target_user_id: None,
        },
        None => EventFilter {
            classroom_id: None,
            target_user_id: Some(user.user_id),
        },
    };
    let limit = PageRequest::new(params.limit.unwrap_or(10), 0).limit;
    let events = state.event_log.list_by_kind(kind, filter, limit).await?;
    Ok(Json(json!({ "events": events })))
}

/// `GET /api/events/mine` — events the caller caused or was targeted by.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let events = state
        .event_log
        .list_for_user(user.user_id, params.page())
        .await?;
    Ok(Json(json!({ "events": events })))
}
