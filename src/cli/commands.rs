use crate::api::server::{init_tracing, ApiConfig};
use crate::api::run_api_server;
use crate::config::ReportConfig;
use crate::error::{ReportError, ReportResult};
use crate::excel::SheetLoader;
use crate::render::{render_dashboard, render_error};
use crate::report::charts::chart_label;
use crate::report::{ErrorContext, ReportBuilder};
use crate::types::SheetOutcome;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Build the effective config for a command
fn load_config(file: Option<PathBuf>, config: Option<PathBuf>) -> ReportResult<ReportConfig> {
    ReportConfig::resolve(config.as_deref(), file)
}

/// Execute the report command - load the workbook and summarize it
pub fn report(file: Option<PathBuf>, config: Option<PathBuf>, json: bool) -> ReportResult<()> {
    init_tracing("warn");
    let config = load_config(file, config)?;

    if json {
        let ctx = ReportBuilder::new(&config).build_context()?;
        println!("{}", serde_json::to_string_pretty(&ctx)?);
        return Ok(());
    }

    println!("{}", "📊 Trade Dashboard - Report".bold().green());
    println!("   Workbook: {}\n", config.workbook_path.display());

    let report = ReportBuilder::new(&config).build()?;

    println!("{}", "📋 Sheets:".bold().cyan());
    for sheet in &report.sheets {
        match &sheet.outcome {
            SheetOutcome::Loaded(table) => println!(
                "   {} {} ({} rows, {} columns)",
                "✅".green(),
                sheet.name.bright_blue().bold(),
                table.row_count(),
                table.columns.len()
            ),
            SheetOutcome::Missing => println!(
                "   {} {} ({})",
                "⚠️".yellow(),
                sheet.name.bright_blue(),
                sheet.outcome.status_label().yellow()
            ),
            SheetOutcome::Failed(message) => println!(
                "   {} {} ({}: {})",
                "❌".red(),
                sheet.name.bright_blue(),
                sheet.outcome.status_label().red(),
                message
            ),
        }
    }
    println!();

    println!("{}", "🔎 Detected columns:".bold().cyan());
    for (sheet, roles) in [
        (&config.trend.sheet, &report.trend_roles),
        (&config.country.sheet, &report.country_roles),
    ] {
        println!("   {}", sheet.bright_blue().bold());
        if roles.is_empty() {
            println!("      {}", "(none)".dimmed());
        }
        for (role, column) in roles.iter() {
            println!("      {} → {}", role.to_string().cyan(), column);
        }
    }
    println!();

    println!("{}", "📈 Charts:".bold().cyan());
    if report.charts.is_empty() {
        println!("   {}", "No charts could be built from this workbook".yellow());
    }
    for chart in &report.charts {
        println!("   {} ({})", chart_label(chart.id).bright_blue().bold(), chart.id);
        for (label, total) in chart.trace_totals()? {
            println!("      {} total = {}", label, total.bold());
        }
    }
    for failure in &report.failures {
        println!(
            "   {} {}: {}",
            "❌".red(),
            failure.source.bright_blue(),
            failure.message.red()
        );
    }
    println!();

    println!("{}", "✅ Report complete".bold().green());
    Ok(())
}

/// Execute the render command - write the dashboard page to a file.
///
/// A fatal report error still writes the error page, then fails.
pub fn render(file: Option<PathBuf>, config: Option<PathBuf>, output: PathBuf) -> ReportResult<()> {
    init_tracing("warn");
    let config = load_config(file, config)?;
    let output = output_path(&output);

    println!("{}", "🖥️  Trade Dashboard - Rendering page".bold().green());
    println!("   Workbook: {}", config.workbook_path.display());
    println!("   Output:   {}\n", output.display());

    match ReportBuilder::new(&config).build_context() {
        Ok(ctx) => {
            fs::write(&output, render_dashboard(&ctx))?;
            println!(
                "{}",
                format!(
                    "✅ Dashboard written: {} sheets, {} charts",
                    ctx.sheet_names.len(),
                    ctx.graphs.len()
                )
                .bold()
                .green()
            );
            Ok(())
        }
        Err(e) => {
            fs::write(&output, render_error(&ErrorContext::from(&e)))?;
            println!("{}", "❌ Error page written".bold().red());
            Err(e)
        }
    }
}

/// Execute the sheets command - list workbook sheets against the config
pub fn sheets(file: PathBuf, config: Option<PathBuf>) -> ReportResult<()> {
    init_tracing("warn");
    let config = load_config(Some(file), config)?;
    let available = SheetLoader::new(&config.workbook_path).sheet_names()?;

    println!("{}", "📑 Trade Dashboard - Sheets".bold().green());
    println!("   Workbook: {}\n", config.workbook_path.display());

    println!("{}", "Workbook sheets:".bold().cyan());
    for name in &available {
        let marker = if config.sheets.iter().any(|s| &s.name == name) {
            "✅".green()
        } else {
            "·".dimmed()
        };
        println!("   {} {}", marker, name);
    }

    let missing: Vec<&str> = config
        .sheets
        .iter()
        .map(|s| s.name.as_str())
        .filter(|name| !available.iter().any(|a| a.as_str() == *name))
        .collect();
    if !missing.is_empty() {
        println!();
        println!("{}", "Configured but missing:".bold().yellow());
        for name in missing {
            println!("   {} {}", "⚠️".yellow(), name);
        }
    }

    Ok(())
}

/// Execute the serve command - run the HTTP dashboard until shutdown
pub fn serve(
    host: String,
    port: u16,
    file: Option<PathBuf>,
    config: Option<PathBuf>,
) -> ReportResult<()> {
    let report = load_config(file, config)?;
    let api = ApiConfig { host, port, report };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime
        .block_on(run_api_server(api))
        .map_err(|e| ReportError::Server(e.to_string()))
}

/// Resolve an output path; a directory receives `index.html`
pub fn output_path(output: &Path) -> PathBuf {
    if output.is_dir() {
        output.join("index.html")
    } else {
        output.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_for_directory() {
        let dir = TempDir::new().unwrap();
        assert_eq!(output_path(dir.path()), dir.path().join("index.html"));
    }

    #[test]
    fn test_output_path_for_file() {
        let path = PathBuf::from("out/dashboard.html");
        assert_eq!(output_path(&path), path);
    }

    #[test]
    fn test_render_missing_workbook_writes_error_page() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("index.html");
        let workbook = dir.path().join("hilang.xlsx");

        let result = render(Some(workbook), None, output.clone());
        assert!(matches!(result, Err(ReportError::FileNotFound(_))));

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("File Excel tidak ditemukan di lokasi:"));
        assert!(html.contains("hilang.xlsx"));
    }

    #[test]
    fn test_report_missing_workbook_fails() {
        let dir = TempDir::new().unwrap();
        let result = report(Some(dir.path().join("hilang.xlsx")), None, false);
        assert!(matches!(result, Err(ReportError::FileNotFound(_))));
    }
}
