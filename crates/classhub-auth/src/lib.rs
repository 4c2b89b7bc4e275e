//! # classhub-auth
//!
//! Access token verification for ClassHub. Token *issuance* belongs to the
//! account subsystem; this crate only decodes and validates the bearer
//! tokens presented on the realtime handshake and HTTP boundary.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder};
