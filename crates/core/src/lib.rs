//! Surgecart domain layer.
//!
//! This crate has zero internal dependencies so it can be used by the
//! persistence layer, the API server, and any future CLI tooling without
//! pulling in sqlx or axum.

pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod types;
