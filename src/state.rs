use sqlx::SqlitePool;

/// Shared application state passed to all handlers and extractors.
/// The reqwest client is built once at startup (connection pool, browser
/// user-agent, fetch timeout) and reused by every scrape and relay request.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub http: reqwest::Client,
}
