mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use serde_json::json;

async fn create_quote(
    app: axum::Router,
    number: &str,
    customer_id: i64,
    items: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    common::post_json(
        app,
        "/api/quotes",
        json!({
            "quoteNumber": number,
            "customerId": customer_id,
            "status": "draft",
            "total": 299.80,
            "currency": "EUR",
            "items": items,
            "validDays": 30
        }),
    )
    .await
}

#[tokio::test]
async fn create_quote_returns_201_and_parsed_items() {
    let pool = common::test_pool().await;
    let app = common::create_test_app(pool.clone());
    let customer_id = common::create_customer(app, "Acme GmbH").await;

    let app = common::create_test_app(pool);
    let items = json!([{ "description": "Widget", "quantity": 2, "unitPrice": 149.90 }]);
    let (status, body) = create_quote(app, "Q-TEST-1", customer_id, items).await;

    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(body["quoteNumber"], "Q-TEST-1");
    assert_eq!(body["customerId"], customer_id);
    assert_eq!(body["status"], "draft");
    assert!(body["items"].is_array());
    assert_eq!(body["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn duplicate_quote_number_returns_conflict() {
    let pool = common::test_pool().await;
    let app = common::create_test_app(pool.clone());
    let customer_id = common::create_customer(app, "Acme GmbH").await;

    let app = common::create_test_app(pool.clone());
    let (status, _) = create_quote(app, "Q-DUP", customer_id, json!([])).await;
    assert_eq!(status, StatusCode::CREATED);

    let app = common::create_test_app(pool);
    let (status, body) = create_quote(app, "Q-DUP", customer_id, json!([])).await;
    assert_eq!(status, StatusCode::CONFLICT, "body: {body}");
    assert_eq!(body["error"], "Quote number must be unique");
}

#[tokio::test]
async fn create_quote_records_price_history_per_product_item() {
    let pool = common::test_pool().await;
    let app = common::create_test_app(pool.clone());
    let customer_id = common::create_customer(app, "Acme GmbH").await;
    let app = common::create_test_app(pool.clone());
    let product_id = common::create_product(app, "WID-1", "Widget").await;

    let app = common::create_test_app(pool.clone());
    let items = json!([
        { "productId": product_id, "quantity": 2, "unitPrice": 149.90 },
        { "description": "Ad-hoc line with no product" }
    ]);
    let (status, body) = create_quote(app, "Q-HIST", customer_id, items).await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    let quote_id = body["id"].as_i64().unwrap();

    let app = common::create_test_app(pool);
    let (status, history) =
        common::get_json(app, &format!("/api/price-history?productId={product_id}")).await;

    assert_eq!(status, StatusCode::OK);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1, "only the product-bearing item is recorded");
    assert_eq!(entries[0]["productId"], product_id);
    assert_eq!(entries[0]["customerId"], customer_id);
    assert_eq!(entries[0]["quoteId"], quote_id);
    assert_eq!(entries[0]["price"], 149.90);
}

#[tokio::test]
async fn price_history_without_product_filter_is_empty() {
    let pool = common::test_pool().await;
    let app = common::create_test_app(pool);

    let (status, body) = common::get_json(app, "/api/price-history").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn status_only_update_leaves_other_fields_untouched() {
    let pool = common::test_pool().await;
    let app = common::create_test_app(pool.clone());
    let customer_id = common::create_customer(app, "Acme GmbH").await;
    let app = common::create_test_app(pool.clone());
    let (_, body) = create_quote(app, "Q-STATUS", customer_id, json!([])).await;
    let quote_id = body["id"].as_i64().unwrap();

    let app = common::create_test_app(pool);
    let (status, body) = common::put_json(
        app,
        &format!("/api/quotes/{quote_id}"),
        json!({ "status": "accepted" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["quoteNumber"], "Q-STATUS");
    assert_eq!(body["total"], 299.80);
}

#[tokio::test]
async fn full_update_requires_all_fields() {
    let pool = common::test_pool().await;
    let app = common::create_test_app(pool.clone());
    let customer_id = common::create_customer(app, "Acme GmbH").await;
    let app = common::create_test_app(pool.clone());
    let (_, body) = create_quote(app, "Q-FULL", customer_id, json!([])).await;
    let quote_id = body["id"].as_i64().unwrap();

    // status plus a second field means "full update", which needs the rest.
    let app = common::create_test_app(pool);
    let (status, body) = common::put_json(
        app,
        &format!("/api/quotes/{quote_id}"),
        json!({ "status": "accepted", "total": 500.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
}

#[tokio::test]
async fn delete_quote_removes_its_price_history() {
    let pool = common::test_pool().await;
    let app = common::create_test_app(pool.clone());
    let customer_id = common::create_customer(app, "Acme GmbH").await;
    let app = common::create_test_app(pool.clone());
    let product_id = common::create_product(app, "WID-1", "Widget").await;

    let app = common::create_test_app(pool.clone());
    let items = json!([{ "productId": product_id, "unitPrice": 10.0 }]);
    let (_, body) = create_quote(app, "Q-DEL", customer_id, items).await;
    let quote_id = body["id"].as_i64().unwrap();

    let app = common::create_test_app(pool.clone());
    let (status, body) = common::delete_json(app, &format!("/api/quotes/{quote_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let app = common::create_test_app(pool.clone());
    let (status, _) = common::get_json(app, &format!("/api/quotes/{quote_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let app = common::create_test_app(pool);
    let (_, history) =
        common::get_json(app, &format!("/api/price-history?productId={product_id}")).await;
    assert_eq!(history.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn quote_number_starts_at_one_and_increments_past_max() {
    let pool = common::test_pool().await;
    let year = Utc::now().year();

    let app = common::create_test_app(pool.clone());
    let (status, body) = common::get_json(app, "/api/quote-number").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["quoteNumber"],
        format!("TKL-{year}-0001"),
        "fresh database starts the sequence at 0001"
    );

    let app = common::create_test_app(pool.clone());
    let customer_id = common::create_customer(app, "Acme GmbH").await;
    let app = common::create_test_app(pool.clone());
    let (status, _) = create_quote(
        app,
        &format!("TKL-{year}-0007"),
        customer_id,
        json!([]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let app = common::create_test_app(pool);
    let (_, body) = common::get_json(app, "/api/quote-number").await;
    assert_eq!(body["quoteNumber"], format!("TKL-{year}-0008"));
}

#[tokio::test]
async fn quote_number_ignores_non_numeric_suffixes() {
    let pool = common::test_pool().await;
    let year = Utc::now().year();

    let app = common::create_test_app(pool.clone());
    let customer_id = common::create_customer(app, "Acme GmbH").await;
    let app = common::create_test_app(pool.clone());
    let (status, _) = create_quote(
        app,
        &format!("TKL-{year}-draft"),
        customer_id,
        json!([]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let app = common::create_test_app(pool);
    let (_, body) = common::get_json(app, "/api/quote-number").await;
    assert_eq!(body["quoteNumber"], format!("TKL-{year}-0001"));
}

#[tokio::test]
async fn get_unknown_quote_returns_404() {
    let pool = common::test_pool().await;
    let app = common::create_test_app(pool);

    let (status, body) = common::get_json(app, "/api/quotes/12345").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Quote not found");
}
