//! storage-calc - CO2 storage capacity and project economics
//!
//! Reads named parameters from workbook sheets or CSV files and evaluates the
//! standard screening formulas for CO2 storage projects.
//!
//! # Features
//!
//! - Depleted oil & gas fields: produced volumes and storage capacity
//! - Saline aquifers: storage efficiency, reservoir pressure, plume radius and area
//! - Project economics: NPV, IRR, breakeven year, profitability index
//! - Sheet names, labels and columns configurable through YAML
//!
//! # Example
//!
//! ```no_run
//! use storage_calc::config::Config;
//! use storage_calc::core::{saline, SalineInputs};
//! use storage_calc::table::open_table;
//! use std::path::Path;
//!
//! let config = Config::default();
//! let table = open_table(Path::new("Calculations.xlsx"), &config.saline.sheet, &config.csv)?;
//!
//! let methods = &config.saline.methods;
//! let inputs = SalineInputs::load(&table, &config.saline, methods)?;
//! let results = saline::evaluate(&inputs, methods, &config.saline.factors)?;
//!
//! for metric in &results.metrics {
//!     println!("{}: {:?}", metric.name, metric.value);
//! }
//! # Ok::<(), storage_calc::error::CalcError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{CalcError, CalcResult};
pub use types::{Cell, DataTable, ResultSet};
