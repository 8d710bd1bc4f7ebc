use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, Utc};
use serde_json::{json, Value};
use validator::Validate;

use super::shared::{fetch_quote, validation_error};
use crate::{
    error::{AppError, AppResult},
    models::{Quote, QuoteDto},
    state::AppState,
};

/// Quote numbers follow the TKL-<year>-NNNN convention.
pub const QUOTE_NUMBER_PREFIX: &str = "TKL";

// ============================================================================
// Input validation
// ============================================================================

#[derive(Debug, serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    #[validate(length(min = 1, max = 50, message = "Quote number must be 1–50 characters"))]
    pub quote_number: String,
    pub customer_id: i64,
    pub status: String,
    pub total: f64,
    pub currency: String,
    /// Line items are opaque to the server apart from the price-history
    /// peek at `productId`/`unitPrice`.
    #[serde(default)]
    pub items: Vec<Value>,
    pub valid_days: i64,
    pub notes: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuoteRequest {
    pub customer_id: Option<i64>,
    pub status: Option<String>,
    pub total: Option<f64>,
    pub currency: Option<String>,
    pub items: Option<Vec<Value>>,
    pub valid_days: Option<i64>,
    pub notes: Option<String>,
}

impl UpdateQuoteRequest {
    /// A body carrying only `status` is a status transition (the UI sends
    /// these from the quote list); everything else is a full update.
    fn is_status_only(&self) -> bool {
        self.status.is_some()
            && self.customer_id.is_none()
            && self.total.is_none()
            && self.currency.is_none()
            && self.items.is_none()
            && self.valid_days.is_none()
            && self.notes.is_none()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn encode_items(items: &[Value]) -> AppResult<String> {
    serde_json::to_string(items).map_err(|e| {
        tracing::error!(error = ?e, "Failed to encode quote items");
        AppError::Internal
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/quotes — create a quote.
///
/// Also records one price-history row per line item that names a product,
/// in the same transaction as the quote insert.
pub async fn create_quote(
    State(state): State<AppState>,
    Json(req): Json<CreateQuoteRequest>,
) -> AppResult<(StatusCode, Json<QuoteDto>)> {
    req.validate().map_err(validation_error)?;

    let items_json = encode_items(&req.items)?;
    let now = Utc::now();

    let mut tx = state.pool.begin().await?;

    let quote = sqlx::query_as::<_, Quote>(
        "INSERT INTO quotes (quote_number, customer_id, status, total, currency,
                             items, valid_days, notes, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id, quote_number, customer_id, status, total, currency, items,
                   valid_days, notes, created_at",
    )
    .bind(&req.quote_number)
    .bind(req.customer_id)
    .bind(&req.status)
    .bind(req.total)
    .bind(&req.currency)
    .bind(&items_json)
    .bind(req.valid_days)
    .bind(&req.notes)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for item in &req.items {
        let Some(product_id) = item.get("productId").and_then(Value::as_i64) else {
            continue;
        };
        let unit_price = item.get("unitPrice").and_then(Value::as_f64);

        sqlx::query(
            "INSERT INTO price_history (product_id, customer_id, quote_id, price, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(product_id)
        .bind(req.customer_id)
        .bind(quote.id)
        .bind(unit_price)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(QuoteDto::from(quote))))
}

/// GET /api/quotes — list all quotes, newest first.
pub async fn list_quotes(State(state): State<AppState>) -> AppResult<Json<Vec<QuoteDto>>> {
    let quotes = sqlx::query_as::<_, Quote>(
        "SELECT id, quote_number, customer_id, status, total, currency, items,
                valid_days, notes, created_at
         FROM quotes ORDER BY id DESC",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(quotes.into_iter().map(QuoteDto::from).collect()))
}

/// GET /api/quotes/:id
pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<QuoteDto>> {
    let quote = fetch_quote(&state.pool, id).await?;
    Ok(Json(QuoteDto::from(quote)))
}

/// PUT /api/quotes/:id — status-only transition or full update.
pub async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateQuoteRequest>,
) -> AppResult<Json<QuoteDto>> {
    let quote = fetch_quote(&state.pool, id).await?;

    if req.is_status_only() {
        let status = req.status.as_deref().unwrap_or(&quote.status);
        let updated = sqlx::query_as::<_, Quote>(
            "UPDATE quotes SET status = ? WHERE id = ?
             RETURNING id, quote_number, customer_id, status, total, currency, items,
                       valid_days, notes, created_at",
        )
        .bind(status)
        .bind(quote.id)
        .fetch_one(&state.pool)
        .await?;

        return Ok(Json(QuoteDto::from(updated)));
    }

    let (Some(customer_id), Some(status), Some(total), Some(currency), Some(valid_days)) = (
        req.customer_id,
        req.status.as_deref(),
        req.total,
        req.currency.as_deref(),
        req.valid_days,
    ) else {
        return Err(AppError::Validation(
            "customerId, status, total, currency and validDays are required".into(),
        ));
    };

    let items_json = encode_items(&req.items.unwrap_or_default())?;

    let updated = sqlx::query_as::<_, Quote>(
        "UPDATE quotes SET customer_id = ?, status = ?, total = ?, currency = ?,
                items = ?, valid_days = ?, notes = ?
         WHERE id = ?
         RETURNING id, quote_number, customer_id, status, total, currency, items,
                   valid_days, notes, created_at",
    )
    .bind(customer_id)
    .bind(status)
    .bind(total)
    .bind(currency)
    .bind(&items_json)
    .bind(valid_days)
    .bind(&req.notes)
    .bind(quote.id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(QuoteDto::from(updated)))
}

/// DELETE /api/quotes/:id — removes the quote and its price-history rows.
pub async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let mut tx = state.pool.begin().await?;

    sqlx::query("DELETE FROM quotes WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM price_history WHERE quote_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(json!({ "success": true })))
}

/// GET /api/quote-number — next number in the TKL-<year>-NNNN sequence.
///
/// Max existing numeric suffix for the current year's prefix plus one,
/// zero-padded to four digits. Non-numeric suffixes are ignored.
pub async fn next_quote_number(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let year = Utc::now().year();
    let prefix = format!("{QUOTE_NUMBER_PREFIX}-{year}-");

    let numbers: Vec<String> =
        sqlx::query_scalar("SELECT quote_number FROM quotes WHERE quote_number LIKE ?")
            .bind(format!("{prefix}%"))
            .fetch_all(&state.pool)
            .await?;

    let max_num = numbers
        .iter()
        .filter_map(|n| n.strip_prefix(&prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    Ok(Json(json!({
        "quoteNumber": format!("{}{:04}", prefix, max_num + 1)
    })))
}
