//! Report configuration
//!
//! Everything the dashboard used to hardcode (workbook path, sheet list,
//! column-name candidates) lives here and can be overridden from YAML.
//! Missing keys fall back to the defaults below.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::report::roles::{ColumnRole, Matcher, RoleRule};
use crate::types::SheetSpec;

pub const DEFAULT_WORKBOOK: &str =
    "Analisis Dampak Ekspor-Impor Pendekatan Tahun 2020-2025 (Covered).xlsx";

pub const PERIOD_SHEET: &str = "Periode & Neraca Perdagangan";
pub const COUNTRY_SHEET: &str = "FOB Negara (Ekspor-Impor)";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Top-level configuration for one dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub workbook_path: PathBuf,
    pub sheets: Vec<SheetSpec>,
    pub trend: TrendChartConfig,
    pub country: CountryChartConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK),
            sheets: default_sheets(),
            trend: TrendChartConfig::default(),
            country: CountryChartConfig::default(),
        }
    }
}

/// The ten sheets shown on the dashboard, in tab order
pub fn default_sheets() -> Vec<SheetSpec> {
    vec![
        SheetSpec::new(PERIOD_SHEET, 0),
        SheetSpec::new("Hasil Analisis 2020-2025", 0),
        SheetSpec::new("2020", 17),
        SheetSpec::new("2021", 17),
        SheetSpec::new("2022", 17),
        SheetSpec::new("2023", 17),
        SheetSpec::new("2024", 17),
        SheetSpec::new("2025", 42),
        SheetSpec::new("Komoditas dan Agregasi", 2),
        SheetSpec::new(COUNTRY_SHEET, 2),
    ]
}

impl ReportConfig {
    /// Load from a YAML file and validate
    pub fn from_yaml_file(path: &Path) -> ReportResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ReportResult<Self> {
        let config: ReportConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config file if given, defaults otherwise; an explicit workbook path
    /// replaces the configured one.
    pub fn resolve(config_path: Option<&Path>, workbook: Option<PathBuf>) -> ReportResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        if let Some(workbook) = workbook {
            config.workbook_path = workbook;
        }
        Ok(config)
    }

    pub fn with_workbook(mut self, path: impl Into<PathBuf>) -> Self {
        self.workbook_path = path.into();
        self
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn validate(&self) -> ReportResult<()> {
        if self.sheets.is_empty() {
            return Err(ReportError::Config("no sheets configured".to_string()));
        }

        let mut seen = HashSet::new();
        for sheet in &self.sheets {
            if sheet.name.trim().is_empty() {
                return Err(ReportError::Config("sheet name is empty".to_string()));
            }
            if !seen.insert(sheet.name.as_str()) {
                return Err(ReportError::Config(format!(
                    "sheet '{}' is listed twice",
                    sheet.name
                )));
            }
        }

        if self.country.top_n == 0 {
            return Err(ReportError::Config(
                "country.top_n must be at least 1".to_string(),
            ));
        }
        if self.country.value_marker.is_empty() {
            return Err(ReportError::Config(
                "country.value_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Yearly trend and balance charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendChartConfig {
    pub sheet: String,
    pub period_candidates: Vec<String>,
    pub export_candidates: Vec<String>,
    pub import_candidates: Vec<String>,
    pub balance_candidates: Vec<String>,
    /// More rows than this are treated as monthly data and summed per year
    pub monthly_threshold: usize,
    /// First year assigned when periods cannot be parsed
    pub synthetic_start_year: i32,
    /// Explicit role → column mapping, checked before name matching
    pub columns: BTreeMap<ColumnRole, String>,
}

impl Default for TrendChartConfig {
    fn default() -> Self {
        Self {
            sheet: PERIOD_SHEET.to_string(),
            period_candidates: strings(&["Period", "Periode", "Tahun", "Year", "Date", "Bulan"]),
            export_candidates: strings(&[
                "Total_Export",
                "Ekspor",
                "Export",
                "Total Ekspor",
                "Nilai Ekspor",
            ]),
            import_candidates: strings(&[
                "Total_Import",
                "Impor",
                "Import",
                "Total Impor",
                "Nilai Impor",
            ]),
            balance_candidates: strings(&[
                "Trade_Balance",
                "Neraca",
                "Balance",
                "Neraca Perdagangan",
                "Saldo",
            ]),
            monthly_threshold: 6,
            synthetic_start_year: 2020,
            columns: BTreeMap::new(),
        }
    }
}

impl TrendChartConfig {
    /// Rules in priority order: Period, Export, Import, Balance
    pub fn rules(&self) -> Vec<RoleRule> {
        vec![
            RoleRule::new(ColumnRole::Period, Matcher::any_of(&self.period_candidates)),
            RoleRule::new(ColumnRole::Export, Matcher::any_of(&self.export_candidates)),
            RoleRule::new(ColumnRole::Import, Matcher::any_of(&self.import_candidates)),
            RoleRule::new(ColumnRole::Balance, Matcher::any_of(&self.balance_candidates)),
        ]
    }
}

/// Top destination countries chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryChartConfig {
    pub sheet: String,
    pub country_candidates: Vec<String>,
    /// Literal marker a value column name must contain
    pub value_marker: String,
    pub top_n: usize,
    pub columns: BTreeMap<ColumnRole, String>,
}

impl Default for CountryChartConfig {
    fn default() -> Self {
        Self {
            sheet: COUNTRY_SHEET.to_string(),
            country_candidates: strings(&["negara", "country", "tujuan"]),
            value_marker: "2024".to_string(),
            top_n: 15,
            columns: BTreeMap::new(),
        }
    }
}

impl CountryChartConfig {
    /// Rules in priority order: Country, Value
    pub fn rules(&self) -> Vec<RoleRule> {
        vec![
            RoleRule::new(ColumnRole::Country, Matcher::any_of(&self.country_candidates)),
            RoleRule::new(
                ColumnRole::Value,
                Matcher::Contains(self.value_marker.clone()),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sheets() {
        let config = ReportConfig::default();
        assert_eq!(config.sheets.len(), 10);
        assert_eq!(config.sheets[0].name, PERIOD_SHEET);
        assert_eq!(config.sheets[7], SheetSpec::new("2025", 42));
        assert_eq!(config.sheets[9], SheetSpec::new(COUNTRY_SHEET, 2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
workbook_path: fixtures/neraca.xlsx
country:
  top_n: 10
"#;
        let config = ReportConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.workbook_path, PathBuf::from("fixtures/neraca.xlsx"));
        assert_eq!(config.country.top_n, 10);
        assert_eq!(config.country.value_marker, "2024");
        assert_eq!(config.sheets.len(), 10);
        assert_eq!(config.trend.monthly_threshold, 6);
    }

    #[test]
    fn test_yaml_column_overrides() {
        let yaml = r#"
trend:
  columns:
    export: Nilai FOB
    period: Bulan Laporan
"#;
        let config = ReportConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(
            config.trend.columns.get(&ColumnRole::Export).map(String::as_str),
            Some("Nilai FOB")
        );
        assert_eq!(
            config.trend.columns.get(&ColumnRole::Period).map(String::as_str),
            Some("Bulan Laporan")
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_sheets() {
        let yaml = r#"
sheets:
  - name: "2020"
    header_skip_rows: 17
  - name: "2020"
"#;
        let err = ReportConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn test_validate_rejects_empty_sheet_list() {
        let err = ReportConfig::from_yaml_str("sheets: []").unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_top_n() {
        let err = ReportConfig::from_yaml_str("country:\n  top_n: 0").unwrap_err();
        assert!(err.to_string().contains("top_n"));
    }

    #[test]
    fn test_resolve_workbook_override() {
        let config = ReportConfig::resolve(None, Some(PathBuf::from("other.xlsx"))).unwrap();
        assert_eq!(config.workbook_path, PathBuf::from("other.xlsx"));
        assert_eq!(config.sheets.len(), 10);
    }

    #[test]
    fn test_trend_rules_priority_order() {
        let rules = TrendChartConfig::default().rules();
        let roles: Vec<ColumnRole> = rules.iter().map(|r| r.role).collect();
        assert_eq!(
            roles,
            vec![
                ColumnRole::Period,
                ColumnRole::Export,
                ColumnRole::Import,
                ColumnRole::Balance
            ]
        );
    }
}
