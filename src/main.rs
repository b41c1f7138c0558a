use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trade_dashboard::cli;
use trade_dashboard::error::ReportResult;

#[derive(Parser)]
#[command(name = "trade-dashboard")]
#[command(about = "Indonesian export-import dashboard built from one Excel workbook")]
#[command(long_about = "Trade Dashboard - Analisis Dampak Ekspor-Impor 2020-2025
Reads the trade workbook, renders every sheet as a table and derives
yearly trend, trade balance and top destination country charts.

COMMANDS:
  report  - Summarize sheets, detected columns and charts
  render  - Write the dashboard page to an HTML file
  sheets  - List workbook sheets against the configured ones
  serve   - Run the dashboard HTTP server

EXAMPLES:
  trade-dashboard report data/neraca.xlsx
  trade-dashboard report --json > report.json
  trade-dashboard render data/neraca.xlsx -o dashboard.html
  trade-dashboard serve --port 3000 --config dashboard.yaml")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize sheets, detected columns and charts
    Report {
        /// Path to the workbook (defaults to the configured path)
        file: Option<PathBuf>,

        /// YAML config with sheet list and column overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the render context as JSON
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Write the dashboard page to an HTML file.

The page is self-contained apart from the Bootstrap and Plotly CDN links.
If the workbook cannot be read the error page is written instead and the
command exits with an error.")]
    /// Write the dashboard page to an HTML file
    Render {
        /// Path to the workbook (defaults to the configured path)
        file: Option<PathBuf>,

        /// YAML config with sheet list and column overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output HTML file (a directory receives index.html)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List workbook sheets and mark the configured ones
    Sheets {
        /// Path to the workbook
        file: PathBuf,

        /// YAML config with sheet list
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run the dashboard HTTP server
    Serve {
        /// Path to the workbook (defaults to the configured path)
        file: Option<PathBuf>,

        /// Host address to bind to (use 0.0.0.0 for all interfaces)
        #[arg(short = 'H', long, default_value = "127.0.0.1", env = "DASHBOARD_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080", env = "DASHBOARD_PORT")]
        port: u16,

        /// YAML config with sheet list and column overrides
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ReportResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report { file, config, json } => cli::report(file, config, json),

        Commands::Render {
            file,
            config,
            output,
        } => cli::render(file, config, output),

        Commands::Sheets { file, config } => cli::sheets(file, config),

        Commands::Serve {
            file,
            host,
            port,
            config,
        } => cli::serve(host, port, file, config),
    }
}
