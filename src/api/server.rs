//! Dashboard HTTP server
//!
//! Serves the dashboard page plus a JSON view of the same report.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::ReportConfig;

/// Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub report: ReportConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            report: ReportConfig::default(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub version: String,
    pub report: Arc<ReportConfig>,
}

impl AppState {
    pub fn new(report: ReportConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            report: Arc::new(report),
        }
    }
}

/// Build the router; used by the server and by tests
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dashboard pages
        .route("/", get(handlers::dashboard))
        .route("/index", get(handlers::dashboard))
        // Health and info endpoints
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // JSON report
        .route("/api/v1/report", get(handlers::report))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Install the tracing subscriber; later calls are no-ops
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the dashboard server until Ctrl+C or SIGTERM
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    init_tracing("trade_dashboard=info,tower_http=info");

    config.report.validate()?;
    let workbook = config.report.workbook_path.display().to_string();
    let state = Arc::new(AppState::new(config.report));
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Trade dashboard starting on http://{}", addr);
    info!("   Workbook: {}", workbook);
    info!("   Pages: /, /index  JSON: /api/v1/report  Health: /health, /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Trade dashboard shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
