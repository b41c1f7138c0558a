//! Table → HTML fragments

use maud::html;

use crate::types::Table;

pub const TABLE_CLASSES: &str = "dataframe table table-striped table-bordered datatable-class";

/// Element id for a sheet's table: spaces become dashes, ampersands vanish
pub fn table_id(sheet_name: &str) -> String {
    format!("table-{}", sheet_name.replace(' ', "-").replace('&', ""))
}

/// Render a table without an index column
pub fn table_to_html(table: &Table, id: &str) -> String {
    html! {
        table border="1" class=(TABLE_CLASSES) id=(id) {
            thead {
                tr style="text-align: right;" {
                    @for column in &table.columns {
                        th { (column.name) }
                    }
                }
            }
            tbody {
                @for row in 0..table.row_count() {
                    tr {
                        @for column in &table.columns {
                            td { (column.values[row].display()) }
                        }
                    }
                }
            }
        }
    }
    .into_string()
}

pub fn missing_marker(sheet_name: &str) -> String {
    html! {
        p class="text-danger" { "Sheet '" (sheet_name) "' tidak ditemukan." }
    }
    .into_string()
}

pub fn failed_marker(sheet_name: &str, error: &str) -> String {
    html! {
        p class="text-danger" { "Gagal memuat sheet '" (sheet_name) "': " (error) }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, Column};

    #[test]
    fn test_table_id() {
        assert_eq!(
            table_id("Periode & Neraca Perdagangan"),
            "table-Periode--Neraca-Perdagangan"
        );
        assert_eq!(table_id("2020"), "table-2020");
        assert_eq!(
            table_id("FOB Negara (Ekspor-Impor)"),
            "table-FOB-Negara-(Ekspor-Impor)"
        );
    }

    #[test]
    fn test_table_to_html() {
        let mut table = Table::new("2020");
        table.add_column(Column::new(
            "Negara",
            vec![Cell::Text("Jepang".into()), Cell::Text("R&D".into())],
        ));
        table.add_column(Column::new(
            "Nilai",
            vec![Cell::Number(10.0), Cell::Empty],
        ));

        let html = table_to_html(&table, &table_id("2020"));

        assert!(html.starts_with(
            "<table border=\"1\" class=\"dataframe table table-striped table-bordered datatable-class\" id=\"table-2020\">"
        ));
        assert!(html.contains("<thead><tr style=\"text-align: right;\"><th>Negara</th><th>Nilai</th></tr></thead>"));
        assert!(html.contains("<td>Jepang</td>"));
        assert!(html.contains("<td>R&amp;D</td>"));
        assert!(html.contains("<td>10</td>"));
        assert!(html.contains("<td>NaN</td>"));
        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(html.ends_with("</table>"));
    }

    #[test]
    fn test_header_and_id_are_escaped() {
        let mut table = Table::new("x");
        table.add_column(Column::new("<b>Ekspor</b>", vec![Cell::Number(1.0)]));

        let html = table_to_html(&table, "table-\"x\"");
        assert!(html.contains("id=\"table-&quot;x&quot;\""));
        assert!(html.contains("<th>&lt;b&gt;Ekspor&lt;/b&gt;</th>"));
    }

    #[test]
    fn test_markers() {
        assert_eq!(
            missing_marker("2025"),
            "<p class=\"text-danger\">Sheet '2025' tidak ditemukan.</p>"
        );
        assert_eq!(
            failed_marker("2025", "bad <xml>"),
            "<p class=\"text-danger\">Gagal memuat sheet '2025': bad &lt;xml&gt;</p>"
        );
    }
}
