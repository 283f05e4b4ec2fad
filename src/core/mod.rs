//! Formula library: depleted fields, saline aquifers and project economics

pub mod depleted;
pub mod economics;
pub mod saline;

pub use depleted::DepletedInputs;
pub use economics::{EconomicInputs, IrrSolver};
pub use saline::{EmpiricalFactors, RadiusMethod, SalineInputs};
