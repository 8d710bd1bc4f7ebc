use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{error::AppResult, models::PriceHistoryEntry, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryQuery {
    pub product_id: Option<i64>,
}

/// GET /api/price-history?productId=<id>
///
/// Price points recorded for the product when quotes were created. Without
/// a product filter the result is empty.
pub async fn list_price_history(
    State(state): State<AppState>,
    Query(params): Query<PriceHistoryQuery>,
) -> AppResult<Json<Vec<PriceHistoryEntry>>> {
    let Some(product_id) = params.product_id else {
        return Ok(Json(vec![]));
    };

    let history = sqlx::query_as::<_, PriceHistoryEntry>(
        "SELECT id, product_id, customer_id, quote_id, price, created_at
         FROM price_history WHERE product_id = ?",
    )
    .bind(product_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(history))
}
