use std::time::Duration;

use axum::extract::State;
use axum::Json;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::error::{AppError, AppResult, FetchError};
use crate::models::ProductMetadata;
use crate::state::AppState;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_BRAND_LEN: usize = 100;
pub const MAX_MODEL_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

// ── Public helpers ─────────────────────────────────────────────────────────

/// Build the process-wide HTTP client used for scraping and the image relay.
///
/// A realistic desktop user-agent is required; several retailers reject
/// default client identifiers outright. The timeout covers connection plus
/// full body read. Redirects stay on reqwest's default bounded policy.
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
}

/// Fetch `url` and return the response body as text.
///
/// Single attempt, no retries. Non-2xx statuses are reported as
/// `FetchError::Http` so callers can distinguish them from transport
/// failures and timeouts.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await.map_err(FetchError::from)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http(status.as_u16()));
    }

    response.text().await.map_err(FetchError::from)
}

/// Parse `html` and derive a best-effort `ProductMetadata` record.
///
/// This call cannot fail: extraction is advisory, and the parser recovers
/// from arbitrarily malformed markup. Worst case is an all-empty record.
///
/// Each field is an ordered probe chain, most-authoritative source first:
/// Open Graph tags are an explicit publisher contract and always win over
/// structural scraping.
pub fn extract_product_metadata(html: &str, base_url: &str) -> ProductMetadata {
    let document = Html::parse_document(html);

    let image_url = get_meta_property(&document, "og:image")
        .or_else(|| first_content_image(&document, base_url));

    let title = get_meta_property(&document, "og:title")
        .or_else(|| get_title_tag(&document))
        .unwrap_or_default();

    let description = get_meta_property(&document, "og:description")
        .or_else(|| get_meta_name(&document, "description"))
        .unwrap_or_default();

    // Brand/model derive from the full title, before output truncation.
    let (brand, model) = derive_brand_model(&title);

    ProductMetadata {
        image_url,
        title: truncate_chars(&title, MAX_TITLE_LEN),
        brand,
        model,
        description: truncate_chars(&description, MAX_DESCRIPTION_LEN),
    }
}

// ── Extraction probes ──────────────────────────────────────────────────────

fn get_meta_property(doc: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{property}"]"#)).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn get_meta_name(doc: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{name}"]"#)).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn get_title_tag(doc: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Scan `<img>` elements in document order and return the first plausible
/// product image, resolved to an absolute URL.
///
/// Hero images tend to appear early in the markup, so document order is the
/// ranking; logos and icons are excluded by name, not by layout position.
/// `data-src` covers lazy-loaded images that carry no `src`.
fn first_content_image(doc: &Html, base_url: &str) -> Option<String> {
    let selector = Selector::parse("img").ok()?;

    let candidate = doc.select(&selector).find_map(|el| {
        let src = el
            .value()
            .attr("src")
            .filter(|s| !s.is_empty())
            .or_else(|| el.value().attr("data-src").filter(|s| !s.is_empty()))?;

        let lower = src.to_lowercase();
        if lower.contains("logo") || lower.contains("icon") {
            None
        } else {
            Some(src)
        }
    })?;

    resolve_against(base_url, candidate)
}

/// Resolve `candidate` against `base_url` with standard URL semantics
/// (scheme-relative, path-relative, and query-only forms all work).
fn resolve_against(base_url: &str, candidate: &str) -> Option<String> {
    match Url::parse(base_url) {
        Ok(base) => base.join(candidate).ok().map(Into::into),
        // An unparseable base still permits an already-absolute candidate.
        Err(_) => Url::parse(candidate).ok().map(Into::into),
    }
}

/// Derive brand and model from a page title.
///
/// Pages commonly title themselves "Brand - Model ...", so the literal
/// " - " separator is tried first. Without it, the first word stands in for
/// the brand and the next up to two words for the model, a low-confidence
/// fallback kept because no stronger signal exists absent Open Graph tags.
fn derive_brand_model(title: &str) -> (String, String) {
    if title.is_empty() {
        return (String::new(), String::new());
    }

    let parts: Vec<&str> = title.split(" - ").collect();
    if parts.len() >= 2 {
        return (
            truncate_chars(parts[0].trim(), MAX_BRAND_LEN),
            truncate_chars(parts[1].trim(), MAX_MODEL_LEN),
        );
    }

    let words: Vec<&str> = title.split_whitespace().collect();
    let brand = words.first().copied().unwrap_or("");
    let model = if words.len() > 1 {
        words[1..words.len().min(3)].join(" ")
    } else {
        String::new()
    };

    (
        truncate_chars(brand, MAX_BRAND_LEN),
        truncate_chars(&model, MAX_MODEL_LEN),
    )
}

/// Hard character cut; never panics, regardless of input length or where
/// multi-byte characters fall.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// ── Request body ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScrapeProductRequest {
    pub url: Option<String>,
}

// ── Handler ────────────────────────────────────────────────────────────────

/// POST /api/scrape-product
///
/// Fetch the given product page and return best-effort metadata for
/// pre-filling the product form. Fetch failures map to 400; extraction
/// itself never fails and is not retried.
pub async fn scrape_product(
    State(state): State<AppState>,
    Json(req): Json<ScrapeProductRequest>,
) -> AppResult<Json<Value>> {
    let url = req
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::Validation("URL is required".into()))?;

    let html = fetch_page(&state.http, &url).await.map_err(|e| {
        tracing::warn!(error = %e, url = %url, "Failed to fetch product page");
        e
    })?;

    let data = extract_product_metadata(&html, &url);

    Ok(Json(json!({ "success": true, "data": data })))
}

// ── Unit tests ─────────────────────────────────────────────────────────────
