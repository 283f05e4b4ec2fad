//! Workbook reader - Excel/OpenDocument sheet → DataTable

use crate::error::{CalcError, CalcResult};
use crate::types::{Cell, DataTable};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reader for multi-sheet workbooks (.xlsx, .xlsm, .xlsb, .xls, .ods)
pub struct WorkbookReader {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookReader {
    /// Open a workbook, detecting the format from the file extension
    pub fn open<P: AsRef<Path>>(path: P) -> CalcResult<Self> {
        let path = path.as_ref().to_path_buf();
        let workbook = open_workbook_auto(&path).map_err(|e| {
            CalcError::Workbook(format!(
                "Failed to open workbook '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self { path, workbook })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all sheets, in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names().iter().any(|s| s == name)
    }

    /// Load a named sheet into a table
    pub fn read_sheet(&mut self, name: &str) -> CalcResult<DataTable> {
        if !self.has_sheet(name) {
            return Err(CalcError::SheetNotFound(name.to_string()));
        }

        let range = self.workbook.worksheet_range(name).map_err(|e| {
            CalcError::Workbook(format!("Failed to read sheet '{}': {}", name, e))
        })?;

        let table = range_to_table(name, &range);
        debug!(
            sheet = name,
            rows = table.row_count(),
            cols = table.width(),
            "loaded sheet"
        );
        Ok(table)
    }
}

/// Copy a calamine range into a table with absolute positions
///
/// calamine ranges start at the first used cell; rows and columns before it are
/// filled with `Cell::Empty` so that column C is always index 2.
fn range_to_table(name: &str, range: &Range<Data>) -> DataTable {
    let mut table = DataTable::new(name);

    let Some((end_row, end_col)) = range.end() else {
        return table; // Empty sheet
    };

    for row in 0..=end_row {
        let cells = (0..=end_col)
            .map(|col| range.get_value((row, col)).map_or(Cell::Empty, convert_cell))
            .collect();
        table.push_row(cells);
    }

    table
}

/// Convert a calamine cell to a table cell
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Empty => Cell::Empty,
        // Dates, durations and error cells (#N/A, #DIV/0!) keep their text form
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell_numbers() {
        assert_eq!(convert_cell(&Data::Float(0.25)), Cell::Number(0.25));
        assert_eq!(convert_cell(&Data::Int(300)), Cell::Number(300.0));
    }

    #[test]
    fn test_convert_cell_text() {
        assert_eq!(
            convert_cell(&Data::String("Porosity".to_string())),
            Cell::Text("Porosity".to_string())
        );
        assert_eq!(convert_cell(&Data::String(String::new())), Cell::Empty);
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::Bool(true));
    }

    #[test]
    fn test_range_to_table_keeps_absolute_positions() {
        // Range starting at C2 (row 1, col 2)
        let mut range = Range::new((1, 2), (2, 4));
        range.set_value((1, 2), Data::String("Porosity".to_string()));
        range.set_value((1, 4), Data::Float(0.2));
        range.set_value((2, 2), Data::String("Permeability".to_string()));
        range.set_value((2, 4), Data::Int(100));

        let table = range_to_table("Saline Storage", &range);

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.get(0, 0), &Cell::Empty);
        assert_eq!(table.get(1, 2), &Cell::Text("Porosity".to_string()));
        assert_eq!(table.get(1, 4), &Cell::Number(0.2));
        assert_eq!(table.get(2, 4), &Cell::Number(100.0));
        assert_eq!(table.get(2, 3), &Cell::Empty);
    }

    #[test]
    fn test_range_to_table_empty() {
        let range: Range<Data> = Range::empty();
        let table = range_to_table("Empty", &range);
        assert!(table.is_empty());
    }

    #[test]
    fn test_open_missing_workbook() {
        let result = WorkbookReader::open("does-not-exist.xlsx");
        assert!(matches!(result, Err(CalcError::Workbook(_))));
    }
}
