//! Capability traits implemented by collaborating subsystems.

pub mod roster;

pub use roster::RosterProvider;
