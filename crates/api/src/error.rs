use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use surgecart_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `surgecart_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => {
                let field = core.field();
                match core {
                    CoreError::NotFound { .. } => {
                        (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string(), field)
                    }
                    CoreError::Validation { .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "VALIDATION_ERROR",
                        core.to_string(),
                        field,
                    ),
                    CoreError::InsufficientStock { .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "INSUFFICIENT_STOCK",
                        core.to_string(),
                        field,
                    ),
                    CoreError::HoldNotUsable { .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "HOLD_NOT_USABLE",
                        core.to_string(),
                        field,
                    ),
                    CoreError::HoldAlreadyConsumed { .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "HOLD_ALREADY_CONSUMED",
                        core.to_string(),
                        field,
                    ),
                    CoreError::OrderNotFound { .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "ORDER_NOT_FOUND",
                        core.to_string(),
                        field,
                    ),
                    CoreError::IdempotencyKeyConflict { .. } => (
                        StatusCode::CONFLICT,
                        "IDEMPOTENCY_KEY_CONFLICT",
                        core.to_string(),
                        field,
                    ),
                    CoreError::TransientConflict(reason) => {
                        tracing::warn!(%reason, "Transient conflict exhausted retries");
                        (
                            StatusCode::SERVICE_UNAVAILABLE,
                            "TRANSIENT_CONFLICT",
                            "The request conflicted with concurrent activity; retry shortly"
                                .to_string(),
                            None,
                        )
                    }
                    CoreError::Internal(msg) => {
                        tracing::error!(error = %msg, "Internal core error");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "INTERNAL_ERROR",
                            "An internal error occurred".to_string(),
                            None,
                        )
                    }
                }
            }

            // --- Database errors ---
            AppError::Database(err) => {
                let (status, code, message) = classify_sqlx_error(err);
                (status, code, message, None)
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
        };

        let body = match field {
            Some(field) => json!({
                "error": message,
                "code": code,
                "field": field,
            }),
            None => json!({
                "error": message,
                "code": code,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
