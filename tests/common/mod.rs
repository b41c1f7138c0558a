//! Workbook fixtures shared by the integration tests

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};
use trade_dashboard::config::{COUNTRY_SHEET, PERIOD_SHEET};

pub enum Value {
    Num(f64),
    Text(String),
}

pub fn num(v: f64) -> Value {
    Value::Num(v)
}

pub fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

/// One worksheet: `skip_rows` title rows, then a header row, then data
pub struct SheetData {
    pub name: String,
    pub skip_rows: u32,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SheetData {
    pub fn new(name: &str, skip_rows: u32, header: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.to_string(),
            skip_rows,
            header: header.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }
}

pub fn write_workbook(path: &Path, sheets: &[SheetData]) {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name).unwrap();

        if sheet.skip_rows > 0 {
            worksheet
                .write_string(0, 0, format!("Judul {}", sheet.name))
                .unwrap();
        }
        let header_row = sheet.skip_rows;
        for (col, name) in sheet.header.iter().enumerate() {
            worksheet.write_string(header_row, col as u16, name).unwrap();
        }
        for (i, row) in sheet.rows.iter().enumerate() {
            let r = header_row + 1 + i as u32;
            for (col, value) in row.iter().enumerate() {
                match value {
                    Value::Num(v) => worksheet.write_number(r, col as u16, *v).unwrap(),
                    Value::Text(s) => worksheet.write_string(r, col as u16, s).unwrap(),
                };
            }
        }
    }
    workbook.save(path).unwrap();
}

/// Worksheet XML cut off inside `sheetData`
const TRUNCATED_WORKSHEET: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="n"><v>1</v></c>"#;

/// Rewrite the workbook archive with one worksheet part replaced
fn replace_part(path: &Path, part: &str, bytes: &[u8]) {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut parts = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        parts.push((file.name().to_string(), content));
    }
    drop(archive);

    let mut writer = ZipWriter::new(File::create(path).unwrap());
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in parts {
        writer.start_file(name.as_str(), options).unwrap();
        if name == part {
            writer.write_all(bytes).unwrap();
        } else {
            writer.write_all(&content).unwrap();
        }
    }
    writer.finish().unwrap();
}

/// A workbook inside its own temp dir
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
    sheet_names: Vec<String>,
}

impl Fixture {
    pub fn new(sheets: &[SheetData]) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("neraca.xlsx");
        write_workbook(&path, sheets);
        Self {
            _dir: dir,
            path,
            sheet_names: sheets.iter().map(|s| s.name.clone()).collect(),
        }
    }

    /// Truncate the XML of one worksheet so it no longer parses.
    /// Worksheet parts are numbered in the order the sheets were added.
    pub fn corrupt_sheet(&self, name: &str) {
        let index = self
            .sheet_names
            .iter()
            .position(|s| s == name)
            .unwrap_or_else(|| panic!("no sheet named {}", name));
        let part = format!("xl/worksheets/sheet{}.xml", index + 1);
        replace_part(&self.path, &part, TRUNCATED_WORKSHEET);
    }

    /// Path inside the fixture dir that does not exist
    pub fn missing_path(&self) -> PathBuf {
        self.path.with_file_name("hilang.xlsx")
    }
}

/// Period sheet with one row per year
pub fn yearly_period_sheet(rows: &[(f64, f64, f64, f64)]) -> SheetData {
    SheetData::new(
        PERIOD_SHEET,
        0,
        &["Period", "Total_Export", "Total_Import", "Trade_Balance"],
        rows.iter()
            .map(|(year, export, import, balance)| {
                vec![num(*year), num(*export), num(*import), num(*balance)]
            })
            .collect(),
    )
}

/// Period sheet with 24 monthly rows over 2020-2021: export `i + 1`,
/// import `0.5` each month
pub fn monthly_period_sheet() -> SheetData {
    let rows = (0..24)
        .map(|i| {
            let year = 2020 + i / 12;
            let month = i % 12 + 1;
            vec![
                text(&format!("{}-{:02}-01", year, month)),
                num(f64::from(i + 1)),
                num(0.5),
            ]
        })
        .collect();
    SheetData::new(PERIOD_SHEET, 0, &["Periode", "Ekspor", "Impor"], rows)
}

/// Country sheet with `count` countries; country `i` has value `i * 10`
pub fn country_sheet(count: usize) -> SheetData {
    let rows = (1..=count)
        .map(|i| {
            vec![
                text(&format!("Negara {:02}", i)),
                num(i as f64 * 10.0),
                num(i as f64),
            ]
        })
        .collect();
    SheetData::new(
        COUNTRY_SHEET,
        2,
        &["Negara Tujuan", "Nilai FOB 2024", "Nilai FOB 2023"],
        rows,
    )
}

/// Every configured sheet, with the default skip rows
pub fn full_workbook() -> Fixture {
    let mut sheets = vec![
        yearly_period_sheet(&[
            (2020.0, 163.0, 141.0, 22.0),
            (2021.0, 231.0, 196.0, 35.0),
            (2022.0, 292.0, 237.0, 55.0),
        ]),
        SheetData::new(
            "Hasil Analisis 2020-2025",
            0,
            &["Indikator", "Nilai"],
            vec![vec![text("Pertumbuhan"), num(4.5)]],
        ),
    ];
    for (year, skip) in [
        ("2020", 17),
        ("2021", 17),
        ("2022", 17),
        ("2023", 17),
        ("2024", 17),
        ("2025", 42),
    ] {
        sheets.push(SheetData::new(
            year,
            skip,
            &["Bulan", "Ekspor"],
            vec![vec![text("Januari"), num(12.5)]],
        ));
    }
    sheets.push(SheetData::new(
        "Komoditas dan Agregasi",
        2,
        &["Komoditas", "Nilai"],
        vec![vec![text("Batubara"), num(30.0)]],
    ));
    sheets.push(country_sheet(20));
    Fixture::new(&sheets)
}
