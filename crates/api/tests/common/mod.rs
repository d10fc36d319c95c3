// All functions in this module are shared test helpers. Not every test binary
// uses every helper, so we suppress dead_code warnings at the item level.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use surgecart_api::config::ServerConfig;
use surgecart_api::router::build_app_router;
use surgecart_api::state::AppState;
use surgecart_core::clock::{Clock, SystemClock};
use surgecart_core::types::DbId;
use surgecart_db::models::product::{CreateProduct, Product};
use surgecart_db::repositories::ProductRepo;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        hold_ttl_secs: 120,
        lock_timeout_ms: 5000,
        tx_retry_attempts: 3,
        reaper_interval_secs: 60,
        reaper_page_size: 100,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and the system clock.
///
/// Delegates to [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_clock(pool, Arc::new(SystemClock))
}

/// Build the test app with an injected clock (manual clocks for TTL tests).
pub fn build_test_app_with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        clock,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Shared HTTP test helpers
// ---------------------------------------------------------------------------

/// Collect the response body into a `serde_json::Value`.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send a JSON request with the given HTTP method.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST JSON to the given URI and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    send_json(app, Method::POST, uri, body).await
}

/// GET from the given URI.
pub async fn get(app: Router, uri: &str) -> axum::response::Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Checkout domain helpers
// ---------------------------------------------------------------------------

/// Seed a product directly in the database.
pub async fn seed_product(pool: &PgPool, name: &str, total_stock: i32, price_cents: i64) -> Product {
    ProductRepo::create(
        pool,
        &CreateProduct {
            name: name.to_string(),
            total_stock,
            price_cents,
        },
    )
    .await
    .expect("product seeding should succeed")
}

/// Create a hold through the API and return its id.
pub async fn create_hold_ok(app: Router, product_id: DbId, qty: i32) -> DbId {
    let response = post_json(
        app,
        "/holds",
        serde_json::json!({ "product_id": product_id, "qty": qty }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["hold_id"].as_i64().unwrap()
}

/// Create an order through the API and return its id.
pub async fn create_order_ok(app: Router, hold_id: DbId) -> DbId {
    let response = post_json(app, "/orders", serde_json::json!({ "hold_id": hold_id })).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["order_id"].as_i64().unwrap()
}

/// Read a product's current available stock.
pub async fn available_stock(pool: &PgPool, product_id: DbId) -> i32 {
    sqlx::query_scalar("SELECT available_stock FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Read a hold's current status id.
pub async fn hold_status_id(pool: &PgPool, hold_id: DbId) -> i16 {
    sqlx::query_scalar("SELECT status_id FROM holds WHERE id = $1")
        .bind(hold_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Read an order's current status id.
pub async fn order_status_id(pool: &PgPool, order_id: DbId) -> i16 {
    sqlx::query_scalar("SELECT status_id FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Count webhook rows stored for an idempotency key.
pub async fn webhook_rows_for_key(pool: &PgPool, key: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM payment_webhooks WHERE idempotency_key = $1")
        .bind(key)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Rewind a hold's expiry so it reads as already expired.
pub async fn rewind_hold_expiry(pool: &PgPool, hold_id: DbId, secs: i64) {
    sqlx::query("UPDATE holds SET expires_at = NOW() - make_interval(secs => $2) WHERE id = $1")
        .bind(hold_id)
        .bind(secs as f64)
        .execute(pool)
        .await
        .unwrap();
}
