//! WebSocket upgrade endpoint.
//!
//! Authentication happens before the upgrade: an invalid or missing token
//! is a 401 and no registry entry is ever created. After the handshake
//! the channel is push-only; client frames other than close are ignored.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use classhub_realtime::{LiveConnectionRegistry, WsAuthenticator};

use crate::response::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    token: Option<String>,
}

/// `GET /ws?token=...` — authenticate, then upgrade.
///
/// Browsers cannot set headers on WebSocket upgrades, so the token rides
/// in the query string, with the `access_token` cookie as a fallback.
pub async fn upgrade(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> ApiResult<Response> {
    let cookie_token = cookie_value(&headers, "access_token");
    let token = WsAuthenticator::select_token(params.token.as_deref(), cookie_token.as_deref())?;
    let user_id = state.ws_auth.authenticate(token)?;

    let registry = Arc::clone(&state.registry);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, registry, user_id)))
}

/// Drives one registered connection until either side closes it.
async fn handle_socket(socket: WebSocket, registry: Arc<LiveConnectionRegistry>, user_id: Uuid) {
    let (handle, mut outbound) = match registry.register(user_id) {
        Ok(registered) => registered,
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Rejecting WebSocket connection");
            let mut socket = socket;
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };
    let connection_id = handle.id;
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                match frame {
                    Some(frame) => {
                        if sink.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Push-only channel; ignore anything the client sends.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    registry.unregister(connection_id);
    debug!(user_id = %user_id, connection_id = %connection_id, "WebSocket closed");
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_value_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; access_token=abc123; lang=en"),
        );
        assert_eq!(
            cookie_value(&headers, "access_token").as_deref(),
            Some("abc123")
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
