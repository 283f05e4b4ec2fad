//! Tabular input: workbooks, CSV files and parameter lookup
//!
//! - Workbooks (.xlsx, .xlsm, .xlsb, .xls, .ods) are read sheet by sheet
//! - A CSV file is a single table; the requested sheet name is ignored

mod delimited;
mod loader;
mod workbook;

pub use delimited::{read_csv, read_csv_from};
pub use loader::{find_label_row, load_parameters, load_series, require};
pub use workbook::WorkbookReader;

use crate::config::CsvOptions;
use crate::error::{CalcError, CalcResult};
use crate::types::DataTable;
use std::path::Path;

/// Kind of input file, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Workbook,
}

impl SourceKind {
    pub fn detect(path: &Path) -> CalcResult<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "txt" => Ok(SourceKind::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "ods" => Ok(SourceKind::Workbook),
            _ => Err(CalcError::Schema(format!(
                "Unsupported input file '{}': expected .csv, .xlsx, .xlsm, .xlsb, .xls or .ods",
                path.display()
            ))),
        }
    }
}

/// Load the named sheet of a workbook, or the whole of a CSV file
pub fn open_table(path: &Path, sheet: &str, csv: &CsvOptions) -> CalcResult<DataTable> {
    match SourceKind::detect(path)? {
        SourceKind::Csv => read_csv(path, csv),
        SourceKind::Workbook => WorkbookReader::open(path)?.read_sheet(sheet),
    }
}

/// Sheet names of a workbook; a CSV file has one sheet named after its stem
pub fn sheet_names(path: &Path) -> CalcResult<Vec<String>> {
    match SourceKind::detect(path)? {
        SourceKind::Csv => {
            if !path.exists() {
                return Err(CalcError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                )));
            }
            Ok(path
                .file_stem()
                .map(|s| vec![s.to_string_lossy().into_owned()])
                .unwrap_or_default())
        }
        SourceKind::Workbook => Ok(WorkbookReader::open(path)?.sheet_names()),
    }
}
