//! Wire message types for the notifications channel.

pub mod types;

pub use types::PushMessage;
