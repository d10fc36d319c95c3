//! Integration tests for `POST /orders`.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::{
    available_stock, body_json, build_test_app, create_hold_ok, hold_status_id, post_json,
    rewind_hold_expiry, seed_product,
};

#[sqlx::test(migrations = "../db/migrations")]
async fn order_from_active_hold_is_pending(pool: PgPool) {
    let product = seed_product(&pool, "Limited Sneaker", 100, 14900).await;
    let app = build_test_app(pool.clone());

    let hold_id = create_hold_ok(app.clone(), product.id, 3).await;

    let response = post_json(app, "/orders", serde_json::json!({ "hold_id": hold_id })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let order_id = json["order_id"].as_i64().unwrap();
    assert_eq!(json["status"], "pending");

    // Hold is consumed; stock stays reserved (no double decrement).
    assert_eq!(hold_status_id(&pool, hold_id).await, 2);
    assert_eq!(available_stock(&pool, product.id).await, 97);

    let (qty, amount_cents): (i32, i64) =
        sqlx::query_as("SELECT qty, amount_cents FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(qty, 3);
    assert_eq!(amount_cents, 3 * 14900);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn order_amount_uses_price_at_order_creation(pool: PgPool) {
    let product = seed_product(&pool, "Limited Sneaker", 100, 10000).await;
    let app = build_test_app(pool.clone());

    let hold_id = create_hold_ok(app.clone(), product.id, 2).await;

    // Price changes between hold and order; the buyer pays the new price.
    sqlx::query("UPDATE products SET price_cents = 12000 WHERE id = $1")
        .bind(product.id)
        .execute(&pool)
        .await
        .unwrap();

    let response = post_json(app, "/orders", serde_json::json!({ "hold_id": hold_id })).await;
    let order_id = body_json(response).await["order_id"].as_i64().unwrap();

    let amount_cents: i64 = sqlx::query_scalar("SELECT amount_cents FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(amount_cents, 2 * 12000);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn order_from_expired_hold_returns_422(pool: PgPool) {
    let product = seed_product(&pool, "Limited Sneaker", 100, 14900).await;
    let app = build_test_app(pool.clone());

    let hold_id = create_hold_ok(app.clone(), product.id, 1).await;
    rewind_hold_expiry(&pool, hold_id, 60).await;

    let response = post_json(app, "/orders", serde_json::json!({ "hold_id": hold_id })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "HOLD_NOT_USABLE");
    assert_eq!(json["field"], "hold_id");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn order_for_missing_hold_returns_422(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(app, "/orders", serde_json::json!({ "hold_id": 99999 })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "hold_id");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_order_for_same_hold_returns_422(pool: PgPool) {
    let product = seed_product(&pool, "Limited Sneaker", 100, 14900).await;
    let app = build_test_app(pool.clone());

    let hold_id = create_hold_ok(app.clone(), product.id, 1).await;

    let first = post_json(
        app.clone(),
        "/orders",
        serde_json::json!({ "hold_id": hold_id }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // The hold is `used` now, so the engine rejects before the unique
    // constraint ever fires.
    let second = post_json(app, "/orders", serde_json::json!({ "hold_id": hold_id })).await;
    assert_eq!(second.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(second).await;
    assert_eq!(json["code"], "HOLD_NOT_USABLE");

    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE hold_id = $1")
        .bind(hold_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orders, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn order_from_cancelled_hold_returns_422(pool: PgPool) {
    let product = seed_product(&pool, "Limited Sneaker", 100, 14900).await;
    let app = build_test_app(pool.clone());

    let hold_id = create_hold_ok(app.clone(), product.id, 1).await;
    sqlx::query("UPDATE holds SET status_id = 4 WHERE id = $1")
        .bind(hold_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = post_json(app, "/orders", serde_json::json!({ "hold_id": hold_id })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "HOLD_NOT_USABLE");
}
