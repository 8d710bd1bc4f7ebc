use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

mod product_metadata;

pub use product_metadata::ProductMetadata;

// ============================================================================
// Customer Models
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Product Models
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub code: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub unit: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Quote Models
// ============================================================================

/// Internal database row. `items` is the raw JSON text column — use QuoteDto
/// for API responses so clients always receive a parsed array.
#[derive(Debug, Clone, FromRow)]
pub struct Quote {
    pub id: i64,
    pub quote_number: Option<String>,
    pub customer_id: Option<i64>,
    pub status: String,
    pub total: f64,
    pub currency: String,
    pub items: String,
    pub valid_days: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Wire representation of a quote with `items` parsed out of the TEXT column.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDto {
    pub id: i64,
    pub quote_number: Option<String>,
    pub customer_id: Option<i64>,
    pub status: String,
    pub total: f64,
    pub currency: String,
    pub items: Value,
    pub valid_days: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Quote> for QuoteDto {
    fn from(quote: Quote) -> Self {
        // Stored items are opaque JSON; corrupt text degrades to an empty
        // array rather than failing the request.
        let items = serde_json::from_str(&quote.items).unwrap_or_else(|_| Value::Array(vec![]));
        QuoteDto {
            id: quote.id,
            quote_number: quote.quote_number,
            customer_id: quote.customer_id,
            status: quote.status,
            total: quote.total,
            currency: quote.currency,
            items,
            valid_days: quote.valid_days,
            notes: quote.notes,
            created_at: quote.created_at,
        }
    }
}

// ============================================================================
// Price History Models
// ============================================================================

/// One price point recorded when a quote is created, keyed by product,
/// customer, and originating quote.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryEntry {
    pub id: i64,
    pub product_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub quote_id: Option<i64>,
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
}
