//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Pool-level
//! reads accept `&PgPool`; operations that must run under an enclosing
//! transaction (row locks, coordinated writes) accept `&mut PgConnection`
//! so the engine owning the transaction passes `tx.as_mut()`.

pub mod hold_repo;
pub mod order_repo;
pub mod product_repo;
pub mod webhook_repo;

pub use hold_repo::HoldRepo;
pub use order_repo::OrderRepo;
pub use product_repo::ProductRepo;
pub use webhook_repo::WebhookRepo;
