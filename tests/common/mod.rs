// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    routing::{delete, get, post, put},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

use quotedesk_server::handlers::{self, scrape};
use quotedesk_server::state::AppState;

/// Fresh in-memory database with migrations applied.
///
/// A single connection is mandatory: every in-memory SQLite connection is
/// its own database, so a larger pool would scatter tables across them.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Build the full application router wired to a test database pool.
pub fn create_test_app(pool: SqlitePool) -> Router {
    let state = AppState {
        pool,
        http: scrape::build_http_client().expect("Failed to build HTTP client"),
    };
    Router::new()
        .route("/health", get(handlers::health_check))
        // Customer routes
        .route("/api/customers", post(handlers::customers::create_customer))
        .route("/api/customers", get(handlers::customers::list_customers))
        .route("/api/customers/:id", get(handlers::customers::get_customer))
        .route(
            "/api/customers/:id",
            put(handlers::customers::update_customer),
        )
        .route(
            "/api/customers/:id",
            delete(handlers::customers::delete_customer),
        )
        // Product routes
        .route("/api/products", post(handlers::products::create_product))
        .route("/api/products", get(handlers::products::list_products))
        .route("/api/products/:id", get(handlers::products::get_product))
        .route("/api/products/:id", put(handlers::products::update_product))
        .route(
            "/api/products/:id",
            delete(handlers::products::delete_product),
        )
        // Quote routes
        .route("/api/quotes", post(handlers::quotes::create_quote))
        .route("/api/quotes", get(handlers::quotes::list_quotes))
        .route("/api/quotes/:id", get(handlers::quotes::get_quote))
        .route("/api/quotes/:id", put(handlers::quotes::update_quote))
        .route("/api/quotes/:id", delete(handlers::quotes::delete_quote))
        .route("/api/quote-number", get(handlers::quotes::next_quote_number))
        .route(
            "/api/price-history",
            get(handlers::history::list_price_history),
        )
        // Scraping routes
        .route("/api/scrape-product", post(handlers::scrape::scrape_product))
        .route("/api/proxy-image", get(handlers::proxy::proxy_image))
        .with_state(state)
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn delete_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// GET returning the raw response, for endpoints that do not speak JSON
/// (the image relay).
pub async fn get_raw(app: Router, uri: &str) -> (StatusCode, HeaderMap, bytes::Bytes) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ── Scenario helpers ─────────────────────────────────────────────────────────

/// Create a customer and return its id.
pub async fn create_customer(app: Router, name: &str) -> i64 {
    let (status, body) = post_json(
        app,
        "/api/customers",
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "setup create_customer failed: {body}"
    );
    body["id"].as_i64().unwrap()
}

/// Create a product and return its id.
pub async fn create_product(app: Router, code: &str, name: &str) -> i64 {
    let (status, body) = post_json(
        app,
        "/api/products",
        serde_json::json!({ "code": code, "name": name }),
    )
    .await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "setup create_product failed: {body}"
    );
    body["id"].as_i64().unwrap()
}
