//! HTTP and WebSocket request handlers.

pub mod event;
pub mod health;
pub mod notification;
pub mod ws;
