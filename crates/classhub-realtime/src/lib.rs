//! # classhub-realtime
//!
//! Live connection registry for ClassHub. Provides:
//!
//! - WebSocket connection tracking with JWT handshake authentication
//! - A deterministic per-user room (`user:<id>`) joined on register
//! - Best-effort broadcast to every open connection of a user
//!
//! Registry state is process-local and non-durable: it is lost on restart
//! and rebuilt as clients reconnect. Offline users are reached through the
//! notification store instead.

pub mod connection;
pub mod message;
pub mod registry;

pub use connection::authenticator::WsAuthenticator;
pub use message::PushMessage;
pub use registry::LiveConnectionRegistry;
