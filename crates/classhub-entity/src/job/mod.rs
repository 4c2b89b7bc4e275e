//! Delivery job entities.

pub mod model;
pub mod payload;
pub mod status;

pub use model::{CreateJob, Job};
pub use payload::DeliveryPayload;
pub use status::JobStatus;
