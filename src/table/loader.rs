//! Parameter loader - label lookup and numeric coercion

use crate::config::{Layout, ResolvedLayout};
use crate::error::{CalcError, CalcResult};
use crate::types::{Cell, DataTable};
use std::collections::HashMap;
use tracing::debug;

/// Row index of the first data row whose label cell equals `label`
///
/// Matching is exact and case-sensitive. Header rows are skipped.
pub fn find_label_row(table: &DataTable, layout: &ResolvedLayout, label: &str) -> Option<usize> {
    (layout.header_rows..table.row_count())
        .find(|&row| table.get(row, layout.label_column).as_label() == Some(label))
}

fn coerce(field: &str, cell: &Cell) -> CalcResult<f64> {
    cell.as_number().ok_or_else(|| CalcError::NonNumeric {
        field: field.to_string(),
        value: cell.to_string(),
    })
}

/// Load the value of every label in `labels`
///
/// All labels are checked for presence before any value is coerced, so a table
/// that is both missing a field and holding a bad value reports the missing one.
pub fn load_parameters(
    table: &DataTable,
    layout: &Layout,
    labels: &[&str],
) -> CalcResult<HashMap<String, f64>> {
    let layout = layout.resolve(table)?;

    let rows = labels
        .iter()
        .map(|label| {
            find_label_row(table, &layout, label)
                .map(|row| (*label, row))
                .ok_or_else(|| CalcError::MissingField(label.to_string()))
        })
        .collect::<CalcResult<Vec<_>>>()?;

    let mut params = HashMap::with_capacity(rows.len());
    for (label, row) in rows {
        let value = coerce(label, table.get(row, layout.value_column))?;
        debug!(table = %table.name, label, row, value, "parameter");
        params.insert(label.to_string(), value);
    }

    Ok(params)
}

/// Load `count` consecutive values from the row labelled `label`
///
/// Values start at the layout's value column. Cells past the end of the row
/// read as empty and are reported as non-numeric.
pub fn load_series(
    table: &DataTable,
    layout: &Layout,
    label: &str,
    count: usize,
) -> CalcResult<Vec<f64>> {
    let layout = layout.resolve(table)?;
    let row = find_label_row(table, &layout, label)
        .ok_or_else(|| CalcError::MissingField(label.to_string()))?;

    let end = layout.value_column.checked_add(count).ok_or_else(|| {
        CalcError::Validation(format!(
            "Cannot read {} values for '{}' starting at column {}",
            count, label, layout.value_column
        ))
    })?;

    let values = (layout.value_column..end)
        .map(|col| coerce(label, table.get(row, col)))
        .collect::<CalcResult<Vec<_>>>()?;

    debug!(table = %table.name, label, row, count, "series");
    Ok(values)
}

/// Fetch a loaded parameter by label
///
/// Only fails if the label was never requested from [`load_parameters`].
pub fn require(params: &HashMap<String, f64>, label: &str) -> CalcResult<f64> {
    params
        .get(label)
        .copied()
        .ok_or_else(|| CalcError::MissingField(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnRef;
    use pretty_assertions::assert_eq;

    fn layout() -> Layout {
        Layout {
            label_column: ColumnRef::Index(0),
            value_column: ColumnRef::Index(1),
            header_rows: 1,
        }
    }

    fn table(rows: &[(&str, Cell)]) -> DataTable {
        let mut table = DataTable::new("params");
        table.push_row(vec![Cell::from("Label"), Cell::from("Value")]);
        for (label, value) in rows {
            table.push_row(vec![Cell::from(*label), value.clone()]);
        }
        table
    }

    #[test]
    fn test_load_parameters_numbers_and_text() {
        let table = table(&[
            ("Porosity", Cell::Number(0.2)),
            ("Permeability", Cell::from("100")),
        ]);

        let params = load_parameters(&table, &layout(), &["Porosity", "Permeability"]).unwrap();

        assert_eq!(params.len(), 2);
        assert_eq!(params["Porosity"], 0.2);
        assert_eq!(params["Permeability"], 100.0);
    }

    #[test]
    fn test_first_match_wins() {
        let table = table(&[
            ("Porosity", Cell::Number(0.2)),
            ("Porosity", Cell::Number(0.3)),
        ]);
        let params = load_parameters(&table, &layout(), &["Porosity"]).unwrap();
        assert_eq!(params["Porosity"], 0.2);
    }

    #[test]
    fn test_label_match_is_case_sensitive() {
        let table = table(&[("porosity", Cell::Number(0.2))]);
        let err = load_parameters(&table, &layout(), &["Porosity"]).unwrap_err();
        assert!(matches!(err, CalcError::MissingField(ref f) if f == "Porosity"));
    }

    #[test]
    fn test_header_row_not_searched() {
        let table = table(&[]);
        let err = load_parameters(&table, &layout(), &["Label"]).unwrap_err();
        assert!(matches!(err, CalcError::MissingField(_)));
    }

    #[test]
    fn test_missing_field_names_label() {
        let table = table(&[("Porosity", Cell::Number(0.2))]);
        let err = load_parameters(&table, &layout(), &["Porosity", "Permeability"]).unwrap_err();

        match err {
            CalcError::MissingField(field) => assert_eq!(field, "Permeability"),
            other => panic!("Expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_names_value() {
        let table = table(&[("Porosity", Cell::from("N/A"))]);
        let err = load_parameters(&table, &layout(), &["Porosity"]).unwrap_err();

        match err {
            CalcError::NonNumeric { field, value } => {
                assert_eq!(field, "Porosity");
                assert_eq!(value, "N/A");
            }
            other => panic!("Expected NonNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_reported_before_non_numeric() {
        let table = table(&[("Porosity", Cell::from("N/A"))]);
        let err = load_parameters(&table, &layout(), &["Porosity", "Permeability"]).unwrap_err();
        assert!(matches!(err, CalcError::MissingField(_)));
    }

    #[test]
    fn test_empty_and_bool_cells_are_non_numeric() {
        let table = table(&[("Porosity", Cell::Empty), ("Flag", Cell::Bool(true))]);

        let err = load_parameters(&table, &layout(), &["Porosity"]).unwrap_err();
        assert!(matches!(err, CalcError::NonNumeric { ref value, .. } if value.is_empty()));

        let err = load_parameters(&table, &layout(), &["Flag"]).unwrap_err();
        assert!(matches!(err, CalcError::NonNumeric { ref value, .. } if value == "true"));
    }

    #[test]
    fn test_load_series() {
        let mut table = DataTable::new("econ");
        table.push_row(vec![Cell::from("Variables"), Cell::from("Y0"), Cell::from("Y1")]);
        table.push_row(vec![Cell::from("Revenue"), Cell::Number(0.0), Cell::from("40")]);

        let values = load_series(&table, &layout(), "Revenue", 2).unwrap();
        assert_eq!(values, vec![0.0, 40.0]);
    }

    #[test]
    fn test_load_series_too_short() {
        let mut table = DataTable::new("econ");
        table.push_row(vec![Cell::from("Variables")]);
        table.push_row(vec![Cell::from("Revenue"), Cell::Number(0.0)]);

        let err = load_series(&table, &layout(), "Revenue", 3).unwrap_err();
        assert!(matches!(err, CalcError::NonNumeric { ref field, .. } if field == "Revenue"));
    }

    #[test]
    fn test_load_series_count_overflow() {
        let mut table = DataTable::new("econ");
        table.push_row(vec![Cell::from("Variables")]);
        table.push_row(vec![Cell::from("Revenue"), Cell::Number(0.0)]);

        let err = load_series(&table, &layout(), "Revenue", usize::MAX).unwrap_err();
        assert!(matches!(err, CalcError::Validation(_)));
    }

    #[test]
    fn test_load_series_missing_row() {
        let table = table(&[]);
        let err = load_series(&table, &layout(), "Capex", 3).unwrap_err();
        assert!(matches!(err, CalcError::MissingField(ref f) if f == "Capex"));
    }
}
