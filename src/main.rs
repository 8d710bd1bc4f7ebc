use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quotedesk_server::config::Config;
use quotedesk_server::handlers::scrape;
use quotedesk_server::state::AppState;
use quotedesk_server::{db, handlers};

#[tokio::main]
async fn main() {
    // Initialize tracing — JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "quotedesk_server=info,tower_http=info,sqlx=warn"
            .parse()
            .unwrap()
    });

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🚀 Quotedesk Server starting...");

    let config = Config::from_env();
    info!("📝 Configuration loaded");

    // Create database connection pool
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Auto-run pending migrations on startup.
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    info!("✅ Database migrations applied");

    // Run health check
    db::health_check(&pool)
        .await
        .expect("Database health check failed");
    info!("✅ Database health check passed");

    // One client for all scrape and relay requests; connection pooling is
    // per-client in reqwest.
    let http = scrape::build_http_client().expect("Failed to build HTTP client");

    // CORS: permissive in dev, restrictive in production.
    let cors = if config.is_dev {
        info!("🔓 CORS: permissive (dev mode)");
        CorsLayer::permissive()
    } else {
        tracing::warn!(
            "🔒 CORS: restrictive (production mode). \
             Cross-origin requests will be denied."
        );
        CorsLayer::new()
    };

    let addr = config.server_addr();

    let app_state = AppState { pool, http };

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Customer routes
        .route("/api/customers", post(handlers::customers::create_customer))
        .route("/api/customers", get(handlers::customers::list_customers))
        .route("/api/customers/:id", get(handlers::customers::get_customer))
        .route(
            "/api/customers/:id",
            put(handlers::customers::update_customer),
        )
        .route(
            "/api/customers/:id",
            delete(handlers::customers::delete_customer),
        )
        // Product routes
        .route("/api/products", post(handlers::products::create_product))
        .route("/api/products", get(handlers::products::list_products))
        .route("/api/products/:id", get(handlers::products::get_product))
        .route("/api/products/:id", put(handlers::products::update_product))
        .route(
            "/api/products/:id",
            delete(handlers::products::delete_product),
        )
        // Quote routes
        .route("/api/quotes", post(handlers::quotes::create_quote))
        .route("/api/quotes", get(handlers::quotes::list_quotes))
        .route("/api/quotes/:id", get(handlers::quotes::get_quote))
        .route("/api/quotes/:id", put(handlers::quotes::update_quote))
        .route("/api/quotes/:id", delete(handlers::quotes::delete_quote))
        .route("/api/quote-number", get(handlers::quotes::next_quote_number))
        .route(
            "/api/price-history",
            get(handlers::history::list_price_history),
        )
        // Scraping routes
        .route("/api/scrape-product", post(handlers::scrape::scrape_product))
        .route("/api/proxy-image", get(handlers::proxy::proxy_image))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    // Start server
    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
