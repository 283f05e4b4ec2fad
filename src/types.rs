use std::fmt;

//==============================================================================
// Parameter Tables
//==============================================================================

/// A single cell read from a workbook sheet or CSV file
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Empty,
}

impl Cell {
    /// Coerce the cell to a number the way a float parser would
    ///
    /// Text is trimmed before parsing. Booleans and empty cells are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Bool(_) | Cell::Empty => None,
        }
    }

    /// Text used for label matching (exact, case-sensitive)
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// A row/column addressable grid of cells (one sheet or one CSV file)
///
/// Positions are absolute: row 0 and column 0 are the first row and column of
/// the source, even when they are blank.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl DataTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Cell at (row, col); positions outside the populated grid read as `Empty`
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

//==============================================================================
// Results
//==============================================================================

/// Value of a computed metric
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(f64),
    /// Whole years; `None` when the quantity is never reached
    Years(Option<usize>),
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Years(years) => years.map(|y| y as f64),
        }
    }
}

/// One line of a report
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
    pub unit: Option<String>,
}

/// Ordered metrics produced by one analysis run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub title: String,
    pub metrics: Vec<Metric>,
}

impl ResultSet {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            metrics: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: f64, unit: Option<&str>) {
        self.metrics.push(Metric {
            name: name.into(),
            value: MetricValue::Number(value),
            unit: unit.map(str::to_string),
        });
    }

    pub fn push_years(&mut self, name: impl Into<String>, years: Option<usize>) {
        self.metrics.push(Metric {
            name: name.into(),
            value: MetricValue::Years(years),
            unit: None,
        });
    }

    /// Look up a metric by its report name
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.metrics
            .iter()
            .find(|m| m.name == name)
            .map(|m| &m.value)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_as_number() {
        assert_eq!(Cell::Number(1.5).as_number(), Some(1.5));
        assert_eq!(Cell::Text(" 42 ".to_string()).as_number(), Some(42.0));
        assert_eq!(Cell::Text("1e3".to_string()).as_number(), Some(1000.0));
        assert_eq!(Cell::Text("N/A".to_string()).as_number(), None);
        assert_eq!(Cell::Bool(true).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn test_cell_from_str() {
        assert_eq!(Cell::from(""), Cell::Empty);
        assert!(Cell::from("").is_empty());
        assert_eq!(Cell::from("Porosity"), Cell::Text("Porosity".to_string()));
        assert!(!Cell::from(" ").is_empty());
    }

    #[test]
    fn test_data_table_get_out_of_bounds() {
        let mut table = DataTable::new("t");
        table.push_row(vec![Cell::from("a"), Cell::Number(1.0)]);
        assert_eq!(table.get(0, 1), &Cell::Number(1.0));
        assert_eq!(table.get(0, 5), &Cell::Empty);
        assert_eq!(table.get(3, 0), &Cell::Empty);
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn test_result_set_lookup() {
        let mut results = ResultSet::new("Economic Analysis");
        results.push("NPV", 20.0, None);
        results.push_years("Years to Breakeven", None);

        assert_eq!(results.len(), 2);
        assert_eq!(results.get("NPV"), Some(&MetricValue::Number(20.0)));
        assert_eq!(
            results.get("Years to Breakeven"),
            Some(&MetricValue::Years(None))
        );
        assert!(results.get("IRR").is_none());
    }

    #[test]
    fn test_metric_value_as_number() {
        assert_eq!(MetricValue::Number(-0.5).as_number(), Some(-0.5));
        assert_eq!(MetricValue::Years(Some(3)).as_number(), Some(3.0));
        assert_eq!(MetricValue::Years(None).as_number(), None);
    }
}
