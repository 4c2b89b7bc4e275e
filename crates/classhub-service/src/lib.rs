//! # classhub-service
//!
//! Domain services behind the notification pipeline:
//!
//! - [`EventLog`] — append-only domain event log
//! - [`RecipientResolver`] — expands an event into its recipient set
//! - [`NotificationStore`] — durable per-recipient notification rows
//! - [`FanoutService`] — resolve, persist, enqueue, in that order
//!
//! Services own no transport concerns; HTTP and WebSocket surfaces live in
//! `classhub-api` and `classhub-realtime`.

pub mod event_log;
pub mod fanout;
pub mod resolver;
pub mod store;

pub use event_log::EventLog;
pub use fanout::FanoutService;
pub use resolver::RecipientResolver;
pub use store::NotificationStore;
