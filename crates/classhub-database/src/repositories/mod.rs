//! Repository implementations for all ClassHub entities.

pub mod event;
pub mod job;
pub mod notification;
pub mod roster;

pub use event::EventRepository;
pub use job::JobRepository;
pub use notification::NotificationRepository;
pub use roster::SqlRosterProvider;
