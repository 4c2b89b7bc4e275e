//! # classhub-entity
//!
//! Entity models for the ClassHub notification pipeline: immutable domain
//! events, per-recipient notifications, and durable delivery jobs.

pub mod event;
pub mod job;
pub mod notification;
