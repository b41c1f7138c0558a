//! Dashboard and error pages
//!
//! Pages are built with `maud`. Sheet tables and chart JSON arrive already
//! rendered and are inserted as-is; every other value is escaped.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::report::charts::{chart_label, CHART_ORDER};
use crate::report::{ErrorContext, ReportContext};

pub const PAGE_TITLE: &str = "Analisis Dampak Ekspor-Impor 2020-2025";

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js";
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const PAGE_STYLE: &str = "
    .table-container { max-height: 600px; overflow: auto; }
    .chart-card { margin-bottom: 1.5rem; }
";

// Draws every embedded figure into the div named by its data-chart attribute
const PLOT_SCRIPT: &str = r#"
    document.querySelectorAll('script[type="application/json"][data-chart]').forEach(function (node) {
      var figure = JSON.parse(node.textContent);
      Plotly.newPlot(node.dataset.chart, figure.data, figure.layout, { responsive: true });
    });
"#;

/// Tab/pane element id for a sheet, derived from its position
fn pane_id(index: usize) -> String {
    format!("sheet-{}", index)
}

/// JSON inside a `<script>` block must not contain `</`
fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn head(title: &str) -> Markup {
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            title { (title) }
            link rel="stylesheet" href=(BOOTSTRAP_CSS);
            style { (PreEscaped(PAGE_STYLE)) }
        }
    }
}

fn charts(ctx: &ReportContext) -> Markup {
    let mut ids: Vec<&str> = CHART_ORDER
        .iter()
        .copied()
        .filter(|id| ctx.graphs.contains_key(*id))
        .collect();
    ids.extend(
        ctx.graphs
            .keys()
            .map(String::as_str)
            .filter(|id| !CHART_ORDER.iter().any(|known| known == id)),
    );

    html! {
        @if ids.is_empty() {
            p.text-muted { "Tidak ada grafik yang dapat dibuat dari data ini." }
        }
        @for id in ids {
            @let dom_id = format!("chart-{}", id);
            div."col-lg-6".chart-card {
                div.card {
                    div.card-body {
                        h2.h6.card-title { (chart_label(id)) }
                        div id=(dom_id) {}
                        script type="application/json" data-chart=(dom_id) {
                            (PreEscaped(script_safe_json(&ctx.graphs[id])))
                        }
                    }
                }
            }
        }
    }
}

fn tabs(ctx: &ReportContext) -> Markup {
    html! {
        ul.nav.nav-tabs role="tablist" {
            @for (index, name) in ctx.sheet_names.iter().enumerate() {
                li.nav-item role="presentation" {
                    button.nav-link.active[index == 0]
                        data-bs-toggle="tab"
                        data-bs-target=(format!("#{}", pane_id(index)))
                        type="button"
                        role="tab" { (name) }
                }
            }
        }
    }
}

fn panes(ctx: &ReportContext) -> Markup {
    html! {
        div.tab-content.border."border-top-0"."p-3" {
            @for (index, name) in ctx.sheet_names.iter().enumerate() {
                div.tab-pane.fade.show[index == 0].active[index == 0]
                    id=(pane_id(index))
                    role="tabpanel" {
                    div.table-container {
                        @if let Some(table) = ctx.tables.get(name) {
                            (PreEscaped(table))
                        }
                    }
                }
            }
        }
    }
}

/// Full dashboard page for a built report
pub fn render_dashboard(ctx: &ReportContext) -> String {
    html! {
        (DOCTYPE)
        html lang="id" {
            (head(PAGE_TITLE))
            body {
                main.container-fluid."py-4" {
                    h1.h3."mb-4" { (PAGE_TITLE) }
                    section id="charts" class="row" { (charts(ctx)) }
                    (tabs(ctx))
                    (panes(ctx))
                }
                script src=(PLOTLY_JS) {}
                script src=(BOOTSTRAP_JS) {}
                script { (PreEscaped(PLOT_SCRIPT)) }
            }
        }
    }
    .into_string()
}

/// Error page carrying one message
pub fn render_error(ctx: &ErrorContext) -> String {
    html! {
        (DOCTYPE)
        html lang="id" {
            (head("Terjadi Kesalahan"))
            body {
                main.container."py-5" {
                    div.alert.alert-danger role="alert" {
                        h1.h4.alert-heading { "Terjadi Kesalahan" }
                        p."mb-0" { (ctx.error_message) }
                    }
                }
            }
        }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn context() -> ReportContext {
        let mut tables = BTreeMap::new();
        tables.insert("2020".to_string(), "<table id=\"table-2020\"></table>".to_string());
        tables.insert(
            "2021".to_string(),
            "<p class=\"text-danger\">Sheet '2021' tidak ditemukan.</p>".to_string(),
        );
        let mut graphs = BTreeMap::new();
        graphs.insert(
            "neraca_tahunan".to_string(),
            r#"{"data":[],"layout":{"title":{"text":"</script>"}}}"#.to_string(),
        );
        graphs.insert("tren_tahunan".to_string(), r#"{"data":[],"layout":{}}"#.to_string());
        ReportContext {
            tables,
            graphs,
            sheet_names: vec!["2020".to_string(), "2021".to_string()],
        }
    }

    #[test]
    fn test_dashboard_contains_tables_and_tabs() {
        let html = render_dashboard(&context());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<table id=\"table-2020\"></table>"));
        assert!(html.contains("Sheet '2021' tidak ditemukan."));
        assert!(html.contains("data-bs-target=\"#sheet-0\""));
        assert!(html.contains("data-bs-target=\"#sheet-1\""));
        assert!(html.contains("class=\"nav-link active\""));
        assert!(html.contains("class=\"tab-pane fade show active\""));
        assert!(html.contains("class=\"tab-pane fade\""));
        assert!(html.contains("id=\"sheet-1\""));
    }

    #[test]
    fn test_charts_follow_fixed_order() {
        let html = render_dashboard(&context());
        let trend = html.find("chart-tren_tahunan").unwrap();
        let balance = html.find("chart-neraca_tahunan").unwrap();
        assert!(trend < balance);
        assert!(html.contains("<h2 class=\"h6 card-title\">Neraca Perdagangan Tahunan</h2>"));
    }

    #[test]
    fn test_chart_json_cannot_close_script() {
        let html = render_dashboard(&context());
        assert!(html.contains("<\\/script>"));
        // two charts, plotly, bootstrap and the plot script
        assert_eq!(html.matches("</script>").count(), 5);
    }

    #[test]
    fn test_inserted_content_is_not_reinterpreted() {
        let mut tables = BTreeMap::new();
        tables.insert(
            "2020".to_string(),
            "<table id=\"SENTINEL\"></table>".to_string(),
        );
        let mut graphs = BTreeMap::new();
        graphs.insert(
            "tren_tahunan".to_string(),
            r#"{"x":["{{panes}}","{{charts}}","{{tabs}}"]}"#.to_string(),
        );
        let ctx = ReportContext {
            tables,
            graphs,
            sheet_names: vec!["2020".to_string()],
        };

        let html = render_dashboard(&ctx);
        assert_eq!(html.matches("SENTINEL").count(), 1);
        assert!(html.contains(r#"{"x":["{{panes}}","{{charts}}","{{tabs}}"]}"#));
    }

    #[test]
    fn test_sheet_names_are_escaped_in_tabs() {
        let ctx = ReportContext {
            sheet_names: vec!["<Ekspor>".to_string()],
            ..ReportContext::default()
        };
        let html = render_dashboard(&ctx);
        assert!(html.contains(">&lt;Ekspor&gt;</button>"));
    }

    #[test]
    fn test_no_charts_message() {
        let ctx = ReportContext {
            sheet_names: vec!["2020".to_string()],
            ..ReportContext::default()
        };
        let html = render_dashboard(&ctx);
        assert!(html.contains("Tidak ada grafik"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = render_error(&ErrorContext {
            error_message: "File Excel tidak ditemukan di lokasi: <data>.xlsx".to_string(),
        });
        assert!(html.contains("<title>Terjadi Kesalahan</title>"));
        assert!(html.contains("File Excel tidak ditemukan di lokasi: &lt;data&gt;.xlsx"));
    }
}
