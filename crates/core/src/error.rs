use crate::types::DbId;

/// Domain error taxonomy for the checkout flows.
///
/// Engines raise these; the API layer maps each variant to an HTTP status.
/// Business-rule violations carry enough context for a field-targeted
/// message without another database read.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("validation failed on {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error(
        "insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: DbId,
        requested: i32,
        available: i32,
    },

    #[error("hold {hold_id} is not usable: {reason}")]
    HoldNotUsable { hold_id: DbId, reason: &'static str },

    #[error("hold {hold_id} has already been consumed by an order")]
    HoldAlreadyConsumed { hold_id: DbId },

    #[error("order {order_id} not found")]
    OrderNotFound { order_id: DbId },

    #[error("idempotency key {key:?} was already used for a different order")]
    IdempotencyKeyConflict { key: String },

    /// Deadlock, lock timeout, or a unique-key race that resolves to replay.
    /// Retried internally a bounded number of times before surfacing.
    #[error("transient conflict: {0}")]
    TransientConflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The request field a 422-class error should be attached to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CoreError::Validation { field, .. } => Some(field),
            CoreError::InsufficientStock { .. } => Some("qty"),
            CoreError::HoldNotUsable { .. } | CoreError::HoldAlreadyConsumed { .. } => {
                Some("hold_id")
            }
            CoreError::OrderNotFound { .. } => Some("order_id"),
            CoreError::IdempotencyKeyConflict { .. } => Some("idempotency_key"),
            _ => None,
        }
    }

    /// Whether a caller-side retry of the whole operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::TransientConflict(_))
    }
}
