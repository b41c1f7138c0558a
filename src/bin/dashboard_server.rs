//! Trade Dashboard server binary
//!
//! Serves the dashboard page and its JSON report over HTTP.

use clap::Parser;
use std::path::PathBuf;
use trade_dashboard::api::{run_api_server, ApiConfig};
use trade_dashboard::config::ReportConfig;

#[derive(Parser, Debug)]
#[command(name = "dashboard-server")]
#[command(version)]
#[command(about = "Trade Dashboard Server - export-import dashboard over HTTP")]
#[command(long_about = r#"
Trade Dashboard Server

Endpoints:
  - GET  /                 - Dashboard page
  - GET  /index            - Dashboard page
  - GET  /api/v1/report    - Render context as JSON
  - GET  /health           - Health check
  - GET  /version          - Server version and configured sheets

The workbook is re-read on every request, so edits show up on reload.

Example usage:
  dashboard-server                             # Start on localhost:8080
  dashboard-server --host 0.0.0.0 --port 3000
  dashboard-server --workbook data/neraca.xlsx --config dashboard.yaml
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "DASHBOARD_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "DASHBOARD_PORT")]
    port: u16,

    /// YAML config with sheet list and column overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Workbook path, overriding the configured one
    #[arg(short, long, env = "DASHBOARD_WORKBOOK")]
    workbook: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        report: ReportConfig::resolve(args.config.as_deref(), args.workbook)?,
    };

    run_api_server(config).await
}
