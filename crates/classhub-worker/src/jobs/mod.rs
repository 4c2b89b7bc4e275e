//! Concrete job handlers.

pub mod deliver;

pub use deliver::DeliveryJobHandler;
