//! # classhub-api
//!
//! The HTTP and WebSocket boundary. Exposes notification reads and
//! read-state updates, event log queries, the realtime upgrade endpoint
//! and a health probe. All routes except `/health` require a bearer
//! token.

pub mod extract;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
