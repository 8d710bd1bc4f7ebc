use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Assumed when upstream declares no content type; product images are
/// overwhelmingly JPEG in practice.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Deserialize)]
pub struct ProxyImageQuery {
    pub url: Option<String>,
}

/// GET /api/proxy-image?url=<encoded-url>
///
/// Transparent pass-through of a remote image so the browser client can
/// display scraped images without tripping cross-origin restrictions. The
/// upstream content type is preserved verbatim; no allowlist is enforced.
/// All upstream failures collapse to one generic 400.
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(params): Query<ProxyImageQuery>,
) -> AppResult<Response> {
    let url = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::Validation("URL required".into()))?;

    let response = state.http.get(&url).send().await.map_err(|e| {
        tracing::warn!(error = %e, url = %url, "Image relay fetch failed");
        AppError::Relay
    })?;

    if !response.status().is_success() {
        tracing::warn!(status = %response.status(), url = %url, "Image relay upstream error");
        return Err(AppError::Relay);
    }

    // reqwest and axum track different `http` major versions; the upstream
    // header map only accepts reqwest's own name constants.
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let bytes = response.bytes().await.map_err(|e| {
        tracing::warn!(error = %e, url = %url, "Image relay body read failed");
        AppError::Relay
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .map_err(|_| AppError::Internal)
}
