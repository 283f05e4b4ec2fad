//! CSV reader - a single delimited file → DataTable

use crate::config::CsvOptions;
use crate::error::{CalcError, CalcResult};
use crate::types::{Cell, DataTable};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Load a CSV file as a table, dropping the first `skip_rows` lines
///
/// Rows may have different lengths. The table is named after the file stem.
pub fn read_csv(path: &Path, options: &CsvOptions) -> CalcResult<DataTable> {
    let file = File::open(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let table = read_csv_from(BufReader::new(file), &name, options)?;
    debug!(
        path = %path.display(),
        rows = table.row_count(),
        cols = table.width(),
        "loaded csv"
    );
    Ok(table)
}

/// Load CSV data from any reader
pub fn read_csv_from<R: Read>(reader: R, name: &str, options: &CsvOptions) -> CalcResult<DataTable> {
    let delimiter = u8::try_from(options.delimiter).map_err(|_| {
        CalcError::Validation(format!(
            "CSV delimiter must be a single ASCII character, got '{}'",
            options.delimiter
        ))
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut table = DataTable::new(name);
    for result in rdr.records().skip(options.skip_rows) {
        let record = result?;
        table.push_row(record.iter().map(Cell::from).collect());
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SALINE: &str = "\
Saline Storage Calculations,,,,,
,,Parameter,Unit,,Value
,,Porosity,fraction,,0.2
,,Permeability,mD,,100
";

    #[test]
    fn test_read_csv_skips_title_row() {
        let table = read_csv_from(SALINE.as_bytes(), "saline", &CsvOptions::default()).unwrap();

        assert_eq!(table.name, "saline");
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.get(0, 2), &Cell::Text("Parameter".to_string()));
        assert_eq!(table.get(1, 2), &Cell::Text("Porosity".to_string()));
        assert_eq!(table.get(1, 5), &Cell::Text("0.2".to_string()));
        assert_eq!(table.get(1, 0), &Cell::Empty);
    }

    #[test]
    fn test_read_csv_ragged_rows() {
        let data = "title\na,b,c\nd\n";
        let options = CsvOptions {
            skip_rows: 0,
            ..CsvOptions::default()
        };
        let table = read_csv_from(data.as_bytes(), "ragged", &options).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.width(), 3);
        assert_eq!(table.get(2, 1), &Cell::Empty);
    }

    #[test]
    fn test_read_csv_semicolon_delimiter() {
        let data = "x\n;;Porosity;;;0,2\n";
        let options = CsvOptions {
            skip_rows: 1,
            delimiter: ';',
        };
        let table = read_csv_from(data.as_bytes(), "semi", &options).unwrap();
        assert_eq!(table.get(0, 2), &Cell::Text("Porosity".to_string()));
        assert_eq!(table.get(0, 5), &Cell::Text("0,2".to_string()));
    }

    #[test]
    fn test_read_csv_non_ascii_delimiter() {
        let options = CsvOptions {
            skip_rows: 0,
            delimiter: '→',
        };
        let result = read_csv_from("a".as_bytes(), "bad", &options);
        assert!(matches!(result, Err(CalcError::Validation(_))));
    }
}
