//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the write paths that need them

pub mod hold;
pub mod order;
pub mod payment_webhook;
pub mod product;
pub mod status;
