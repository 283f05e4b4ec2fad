//! Named-field schema for locating input parameters in a table
//!
//! Every analysis reads its inputs from one sheet. The schema says which sheet,
//! which column holds the labels, which column holds the values and which label
//! text maps to each logical parameter. All fields default to the layout of the
//! reference calculation workbook, so a config file only needs the differences:
//!
//! ```yaml
//! saline:
//!   layout:
//!     value_column: G
//!   labels:
//!     porosity: Effective Porosity
//! economic:
//!   discount_rate: 0.08
//! ```

use crate::core::saline::{EmpiricalFactors, RadiusMethod};
use crate::error::{CalcError, CalcResult};
use crate::types::DataTable;
use serde::{Deserialize, Serialize};
use std::path::Path;

//==============================================================================
// Column addressing
//==============================================================================

/// Reference to a column of a table
///
/// Accepts a 0-based index (`2`), a spreadsheet column letter (`C`) or the
/// text of a header cell (`{ header: Variables }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Header { header: String },
    Letter(String),
}

impl ColumnRef {
    pub fn letter(letter: &str) -> Self {
        ColumnRef::Letter(letter.to_string())
    }

    pub fn header(text: &str) -> Self {
        ColumnRef::Header {
            header: text.to_string(),
        }
    }

    /// Resolve to a 0-based column index for `table`
    ///
    /// Header references are searched for in the first `header_rows` rows.
    pub fn resolve(&self, table: &DataTable, header_rows: usize) -> CalcResult<usize> {
        match self {
            ColumnRef::Index(idx) => Ok(*idx),
            ColumnRef::Letter(letter) => column_letter_to_number(letter).ok_or_else(|| {
                CalcError::Schema(format!("Invalid column letter '{}'", letter))
            }),
            ColumnRef::Header { header } => {
                for row in 0..header_rows.min(table.row_count()) {
                    for col in 0..table.width() {
                        if table.get(row, col).as_label() == Some(header.as_str()) {
                            return Ok(col);
                        }
                    }
                }
                Err(CalcError::Schema(format!(
                    "Column with header '{}' not found in '{}'",
                    header, table.name
                )))
            }
        }
    }
}

/// Convert an Excel column letter to a 0-based index (A→0, Z→25, AA→26)
pub fn column_letter_to_number(letter: &str) -> Option<usize> {
    if letter.is_empty() || !letter.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let mut result = 0usize;
    for c in letter.to_ascii_uppercase().bytes() {
        result = result.checked_mul(26)?.checked_add((c - b'A' + 1) as usize)?;
    }
    Some(result - 1)
}

/// Where labels and values live in a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub label_column: ColumnRef,
    /// Value column; for row series (economic analysis) the first value column
    pub value_column: ColumnRef,
    /// Leading rows that are never searched for labels
    pub header_rows: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            label_column: ColumnRef::letter("C"),
            value_column: ColumnRef::letter("E"),
            header_rows: 1,
        }
    }
}

/// Layout with every column resolved against a concrete table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLayout {
    pub label_column: usize,
    pub value_column: usize,
    pub header_rows: usize,
}

impl Layout {
    pub fn resolve(&self, table: &DataTable) -> CalcResult<ResolvedLayout> {
        Ok(ResolvedLayout {
            label_column: self.label_column.resolve(table, self.header_rows)?,
            value_column: self.value_column.resolve(table, self.header_rows)?,
            header_rows: self.header_rows,
        })
    }
}

//==============================================================================
// Per-analysis schemas
//==============================================================================

/// Labels for the depleted-field analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepletedLabels {
    pub original_oil_in_place: String,
    pub original_gas_in_place: String,
    pub gas_produced: String,
    pub oil_produced: String,
    pub water_produced: String,
    pub gas_formation_factor: String,
    pub oil_formation_factor: String,
    pub co2_density: String,
}

impl Default for DepletedLabels {
    fn default() -> Self {
        Self {
            original_oil_in_place: "Original Oil in Place".to_string(),
            original_gas_in_place: "Original Gas in Place".to_string(),
            gas_produced: "Gas Produced".to_string(),
            oil_produced: "Oil produced".to_string(),
            water_produced: "Water Produced".to_string(),
            gas_formation_factor: "Bg".to_string(),
            oil_formation_factor: "Formation Oil Factor".to_string(),
            co2_density: "CO2 Density".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepletedSchema {
    pub sheet: String,
    pub layout: Layout,
    pub labels: DepletedLabels,
}

impl Default for DepletedSchema {
    fn default() -> Self {
        Self {
            sheet: "Depleted Field Storage".to_string(),
            layout: Layout::default(),
            labels: DepletedLabels::default(),
        }
    }
}

/// Labels for the saline-aquifer analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalineLabels {
    pub injection_rate: String,
    pub reservoir_thickness: String,
    pub injection_time: String,
    pub porosity: String,
    pub reservoir_depth: String,
    pub pressure_gradient: String,
    pub reservoir_angle: String,
    pub permeability: String,
    pub co2_relative_permeability: String,
    pub co2_density: String,
    pub water_density: String,
    /// Only required by the pressure-diffusion radius
    pub co2_viscosity: String,
}

impl Default for SalineLabels {
    fn default() -> Self {
        Self {
            injection_rate: "Injection Rate".to_string(),
            reservoir_thickness: "Reservoir Thickness".to_string(),
            injection_time: "Injection Time".to_string(),
            porosity: "Porosity".to_string(),
            reservoir_depth: "Reservoir Depth".to_string(),
            pressure_gradient: "Pressure Gradient".to_string(),
            reservoir_angle: "Reservoir Angle".to_string(),
            permeability: "Permeability".to_string(),
            co2_relative_permeability: "CO2 Relative Permeability".to_string(),
            co2_density: "CO2 Density".to_string(),
            water_density: "Water Density".to_string(),
            co2_viscosity: "CO2 Viscosity".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalineSchema {
    pub sheet: String,
    pub layout: Layout,
    pub labels: SalineLabels,
    pub factors: EmpiricalFactors,
    /// Radius estimators reported when none are given on the command line
    pub methods: Vec<RadiusMethod>,
}

impl Default for SalineSchema {
    fn default() -> Self {
        Self {
            sheet: "Saline Storage".to_string(),
            layout: Layout {
                value_column: ColumnRef::letter("F"),
                ..Layout::default()
            },
            labels: SalineLabels::default(),
            factors: EmpiricalFactors::default(),
            methods: RadiusMethod::defaults().to_vec(),
        }
    }
}

/// Row labels for the economic analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicLabels {
    pub revenue: String,
    pub capex: String,
    pub opex: String,
}

impl Default for EconomicLabels {
    fn default() -> Self {
        Self {
            revenue: "Revenue".to_string(),
            capex: "Capex".to_string(),
            opex: "Opex".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicSchema {
    pub sheet: String,
    pub layout: Layout,
    pub labels: EconomicLabels,
    pub project_life_years: usize,
    pub discount_rate: f64,
}

impl Default for EconomicSchema {
    fn default() -> Self {
        Self {
            sheet: "Economic Analysis".to_string(),
            layout: Layout {
                label_column: ColumnRef::header("Variables"),
                value_column: ColumnRef::letter("E"),
                header_rows: 1,
            },
            labels: EconomicLabels::default(),
            project_life_years: 10,
            discount_rate: 0.1,
        }
    }
}

/// Options for reading `.csv` inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Lines dropped before the header row
    pub skip_rows: usize,
    pub delimiter: char,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            skip_rows: 1,
            delimiter: ',',
        }
    }
}

//==============================================================================
// Top-level configuration
//==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub csv: CsvOptions,
    pub depleted: DepletedSchema,
    pub saline: SalineSchema,
    pub economic: EconomicSchema,
}

impl Config {
    /// Load a YAML config file; missing keys keep their defaults
    pub fn load(path: &Path) -> CalcResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> CalcResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Config from an optional file path, falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> CalcResult<Self> {
        match path {
            Some(p) => {
                tracing::debug!(path = %p.display(), "loading config");
                Self::load(p)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> CalcResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn check(&self) -> CalcResult<()> {
        if !self.csv.delimiter.is_ascii() {
            return Err(CalcError::Validation(format!(
                "CSV delimiter must be a single ASCII character, got '{}'",
                self.csv.delimiter
            )));
        }
        if self.economic.project_life_years == 0 {
            return Err(CalcError::Validation(
                "project_life_years must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
