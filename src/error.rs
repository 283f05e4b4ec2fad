use thiserror::Error;

pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Required field '{0}' not found in the data")]
    MissingField(String),

    #[error("Value for '{field}' is not numeric: {value}")]
    NonNumeric { field: String, value: String },

    #[error("No solution found: {0}")]
    NoSolution(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl CalcError {
    /// Whether this error comes from the shape of the input rather than its values
    pub fn is_schema_error(&self) -> bool {
        matches!(self, CalcError::SheetNotFound(_) | CalcError::Schema(_))
    }
}
