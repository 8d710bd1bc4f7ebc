use serde::Serialize;

/// Best-effort metadata scraped from a product page, used to pre-fill the
/// product-creation form.
///
/// Every string field is always present (empty rather than absent); only
/// `image_url` may be omitted, and when present it is an absolute URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub description: String,
}
