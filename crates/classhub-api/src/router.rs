//! Route table.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{event, health, notification, ws};
use crate::state::AppState;

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ws", get(ws::upgrade))
        .route("/api/notifications", get(notification::list))
        .route(
            "/api/notifications/unread-count",
            get(notification::unread_count),
        )
        .route(
            "/api/notifications/{id}/read",
            put(notification::mark_read),
        )
        .route(
            "/api/notifications/read-all",
            put(notification::mark_all_read),
        )
        .route("/api/events", post(event::append))
        .route(
            "/api/events/classroom/{id}",
            get(event::list_for_classroom),
        )
        .route("/api/events/mine", get(event::list_mine))
        .route("/api/events/kind/{kind}", get(event::list_by_kind))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
