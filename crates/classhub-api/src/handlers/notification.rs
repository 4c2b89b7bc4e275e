//! Notification endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use classhub_core::types::pagination::PageRequest;

use crate::extract::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

/// `GET /api/notifications` — the caller's notifications, newest-first.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let page = PageRequest::new(
        params.limit.unwrap_or(PageRequest::default().limit),
        params.offset.unwrap_or(0),
    );
    let notifications = state.notifications.list_for_user(user.user_id, page).await?;
    Ok(Json(json!({ "notifications": notifications })))
}

/// `GET /api/notifications/unread-count`.
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let count = state.notifications.unread_count(user.user_id).await?;
    Ok(Json(json!({ "unread": count })))
}

/// `PUT /api/notifications/{id}/read` — owner-scoped, repeatable.
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let updated = state
        .notifications
        .mark_read(notification_id, user.user_id)
        .await?;
    Ok(Json(json!({ "updated": updated })))
}

/// `PUT /api/notifications/read-all`.
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let updated = state.notifications.mark_all_read(user.user_id).await?;
    Ok(Json(json!({ "updated": updated })))
}
