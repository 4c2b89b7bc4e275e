//! Shared handler state.

use std::sync::Arc;

use classhub_auth::JwtDecoder;
use classhub_database::DatabasePool;
use classhub_realtime::{LiveConnectionRegistry, WsAuthenticator};
use classhub_service::{EventLog, FanoutService, NotificationStore};
use classhub_worker::NotificationQueue;

/// Everything handlers need, built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabasePool,
    pub event_log: EventLog,
    pub notifications: NotificationStore,
    pub fanout: FanoutService,
    pub queue: NotificationQueue,
    pub registry: Arc<LiveConnectionRegistry>,
    pub ws_auth: WsAuthenticator,
    pub jwt: JwtDecoder,
}
