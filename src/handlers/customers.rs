use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

use super::shared::{fetch_customer, validation_error};
use crate::{error::AppResult, models::Customer, state::AppState};

// ============================================================================
// Input validation
// ============================================================================

#[derive(Debug, serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[validate(length(min = 1, max = 200, message = "Customer name must be 1–200 characters"))]
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/customers — create a customer.
pub async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<CustomerPayload>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    req.validate().map_err(validation_error)?;

    let customer = sqlx::query_as::<_, Customer>(
        "INSERT INTO customers (name, company, email, phone, address, created_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING id, name, company, email, phone, address, created_at",
    )
    .bind(&req.name)
    .bind(&req.company)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.address)
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /api/customers — list all customers, newest first.
pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let customers = sqlx::query_as::<_, Customer>(
        "SELECT id, name, company, email, phone, address, created_at
         FROM customers ORDER BY id DESC",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(customers))
}

/// GET /api/customers/:id
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let customer = fetch_customer(&state.pool, id).await?;
    Ok(Json(customer))
}

/// PUT /api/customers/:id — full update.
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CustomerPayload>,
) -> AppResult<Json<Customer>> {
    req.validate().map_err(validation_error)?;

    let customer = fetch_customer(&state.pool, id).await?;

    let updated = sqlx::query_as::<_, Customer>(
        "UPDATE customers SET name = ?, company = ?, email = ?, phone = ?, address = ?
         WHERE id = ?
         RETURNING id, name, company, email, phone, address, created_at",
    )
    .bind(&req.name)
    .bind(&req.company)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.address)
    .bind(customer.id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(updated))
}

/// DELETE /api/customers/:id
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    sqlx::query("DELETE FROM customers WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await?;

    Ok(Json(json!({ "success": true })))
}
