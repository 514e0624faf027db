//! Acadex Circulation Server
//!
//! REST API server for the loan/circulation engine of the Acadex academy
//! administration system.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use acadex_server::{
    api,
    api::scan::ScanGate,
    config::AppConfig,
    models::{borrower::Borrower, item::Item},
    repository::{
        borrowers::InMemoryBorrowerDirectory, custody::InMemoryCustodyStorage,
        items::InMemoryItemRegistry, loans::InMemoryLoanLedger, Repository,
    },
    services::Services,
    AppState,
};

/// Startup inventory: items and borrowers handed over by the (external)
/// registry and directory owners.
#[derive(Deserialize)]
struct SeedData {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    borrowers: Vec<Borrower>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("acadex_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Acadex Circulation Server v{}", env!("CARGO_PKG_VERSION"));

    // Build storage (in-memory reference implementations)
    let items = Arc::new(InMemoryItemRegistry::new());
    let borrowers = Arc::new(InMemoryBorrowerDirectory::new());

    if let Some(path) = &config.storage.seed_path {
        let raw = std::fs::read_to_string(path)?;
        let seed: SeedData = serde_json::from_str(&raw)?;
        tracing::info!(
            items = seed.items.len(),
            borrowers = seed.borrowers.len(),
            "Loaded seed data from {}",
            path
        );
        items.load(seed.items);
        borrowers.load(seed.borrowers);
    }

    let repository = Repository::new(
        items,
        borrowers,
        Arc::new(InMemoryLoanLedger::new()),
        Arc::new(InMemoryCustodyStorage::new()),
    );

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create services and application state
    let services = Services::new(repository);
    let scan_gate = ScanGate::new(Duration::from_millis(config.circulation.scan_debounce_ms));

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        scan_gate: Arc::new(Mutex::new(scan_gate)),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Loans
        .route("/loans", get(api::loans::list_loans))
        .route("/loans", post(api::loans::create_loan))
        .route("/loans/overdue", get(api::loans::list_overdue))
        .route("/loans/:id/return", post(api::loans::return_loan))
        .route("/returns", post(api::loans::register_return))
        // Scan resolution
        .route("/scan", post(api::scan::resolve_scan))
        // Statistics
        .route("/stats/loans", get(api::stats::get_loan_stats))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
