//! Shared plain types used across crates.

pub mod pagination;
