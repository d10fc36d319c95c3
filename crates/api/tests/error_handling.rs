//! Tests for `AppError` -> HTTP response mapping.
//!
//! These tests verify that each error variant produces the correct HTTP
//! status code, error code, and message. They do NOT need an HTTP server --
//! they call `IntoResponse` directly on `AppError` values.

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use surgecart_api::error::AppError;
use surgecart_core::error::CoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_maps_to_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Product",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Product with id 42 not found");
}

#[tokio::test]
async fn validation_maps_to_422_with_field() {
    let err = AppError::Core(CoreError::Validation {
        field: "product_id",
        message: "product 7 does not exist".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "product_id");
}

#[tokio::test]
async fn insufficient_stock_maps_to_422_targeting_qty() {
    let err = AppError::Core(CoreError::InsufficientStock {
        product_id: 1,
        requested: 5,
        available: 2,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INSUFFICIENT_STOCK");
    assert_eq!(json["field"], "qty");
}

#[tokio::test]
async fn hold_not_usable_maps_to_422() {
    let err = AppError::Core(CoreError::HoldNotUsable {
        hold_id: 9,
        reason: "hold has expired",
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "HOLD_NOT_USABLE");
    assert_eq!(json["field"], "hold_id");
}

#[tokio::test]
async fn hold_already_consumed_maps_to_422() {
    let err = AppError::Core(CoreError::HoldAlreadyConsumed { hold_id: 9 });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "HOLD_ALREADY_CONSUMED");
}

#[tokio::test]
async fn order_not_found_maps_to_422() {
    let err = AppError::Core(CoreError::OrderNotFound { order_id: 404 });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "ORDER_NOT_FOUND");
    assert_eq!(json["field"], "order_id");
}

#[tokio::test]
async fn idempotency_key_conflict_maps_to_409() {
    let err = AppError::Core(CoreError::IdempotencyKeyConflict { key: "K1".into() });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "IDEMPOTENCY_KEY_CONFLICT");
}

#[tokio::test]
async fn exhausted_transient_conflict_maps_to_503() {
    let err = AppError::Core(CoreError::TransientConflict("deadlock detected".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "TRANSIENT_CONFLICT");

    // The internal conflict detail stays in the logs, not the response.
    let body_text = json.to_string();
    assert!(!body_text.contains("deadlock"));
}

#[tokio::test]
async fn internal_error_maps_to_500_and_sanitizes_message() {
    let err = AppError::Core(CoreError::Internal(
        "secret database credentials leaked".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");

    let body_text = json.to_string();
    assert!(
        !body_text.contains("secret"),
        "Internal error response must not leak sensitive details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn bad_request_maps_to_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn sqlx_row_not_found_maps_to_404() {
    let err = AppError::Database(sqlx::Error::RowNotFound);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
