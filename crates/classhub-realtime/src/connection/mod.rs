//! Connection tracking primitives.

pub mod authenticator;
pub mod handle;
pub mod pool;

pub use authenticator::WsAuthenticator;
pub use handle::{ConnectionHandle, ConnectionId};
pub use pool::ConnectionPool;
