use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

use super::shared::{fetch_product, validation_error};
use crate::{error::AppResult, models::Product, state::AppState};

// ============================================================================
// Input validation
// ============================================================================

#[derive(Debug, serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 100, message = "Product code must be 1–100 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Product name must be 1–200 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub unit: Option<String>,
    pub image_url: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/products — create a product.
///
/// A duplicate `code` surfaces as 409 with "Product code must be unique"
/// (mapped from the UNIQUE constraint in the AppError conversion).
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductPayload>,
) -> AppResult<(StatusCode, Json<Product>)> {
    req.validate().map_err(validation_error)?;

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (code, name, description, price, currency, unit, image_url, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id, code, name, description, price, currency, unit, image_url, created_at",
    )
    .bind(&req.code)
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.price)
    .bind(&req.currency)
    .bind(&req.unit)
    .bind(&req.image_url)
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products — list all products, newest first.
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT id, code, name, description, price, currency, unit, image_url, created_at
         FROM products ORDER BY id DESC",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = fetch_product(&state.pool, id).await?;
    Ok(Json(product))
}

/// PUT /api/products/:id — full update.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ProductPayload>,
) -> AppResult<Json<Product>> {
    req.validate().map_err(validation_error)?;

    let product = fetch_product(&state.pool, id).await?;

    let updated = sqlx::query_as::<_, Product>(
        "UPDATE products SET code = ?, name = ?, description = ?, price = ?,
                currency = ?, unit = ?, image_url = ?
         WHERE id = ?
         RETURNING id, code, name, description, price, currency, unit, image_url, created_at",
    )
    .bind(&req.code)
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.price)
    .bind(&req.currency)
    .bind(&req.unit)
    .bind(&req.image_url)
    .bind(product.id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(updated))
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await?;

    Ok(Json(json!({ "success": true })))
}
