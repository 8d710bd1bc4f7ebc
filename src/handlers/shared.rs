use validator::ValidationErrors;

use crate::{
    error::{AppError, AppResult},
    models::{Customer, Product, Quote},
};

/// Flatten validator errors into a single 400 message.
pub fn validation_error(e: ValidationErrors) -> AppError {
    AppError::Validation(
        e.field_errors()
            .values()
            .flat_map(|v| v.iter())
            .filter_map(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Fetch a customer row, returning 404 if it does not exist.
pub async fn fetch_customer(pool: &sqlx::SqlitePool, id: i64) -> AppResult<Customer> {
    sqlx::query_as::<_, Customer>(
        "SELECT id, name, company, email, phone, address, created_at
         FROM customers WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Customer not found".into()))
}

/// Fetch a product row, returning 404 if it does not exist.
pub async fn fetch_product(pool: &sqlx::SqlitePool, id: i64) -> AppResult<Product> {
    sqlx::query_as::<_, Product>(
        "SELECT id, code, name, description, price, currency, unit, image_url, created_at
         FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found".into()))
}

/// Fetch a quote row, returning 404 if it does not exist.
pub async fn fetch_quote(pool: &sqlx::SqlitePool, id: i64) -> AppResult<Quote> {
    sqlx::query_as::<_, Quote>(
        "SELECT id, quote_number, customer_id, status, total, currency, items,
                valid_days, notes, created_at
         FROM quotes WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Quote not found".into()))
}
