//! Depleted oil & gas field storage
//!
//! Produced-volume conversions to reservoir barrels and the CO2 storage
//! capacity of the original hydrocarbon pore volume.

use crate::config::DepletedSchema;
use crate::error::CalcResult;
use crate::table::{load_parameters, require};
use crate::types::{DataTable, ResultSet};

/// Mscf per MMscf
const MSCF_PER_MMSCF: f64 = 1000.0;

/// Cubic feet per barrel
const CUBIC_FEET_PER_BARREL: f64 = 5.615;

/// Cubic metres per barrel
const CUBIC_METRES_PER_BARREL: f64 = 0.159;

/// Gas produced in reservoir barrels: gas (MMscf) × Bg × 1000
pub fn gas_produced_rb(gas_produced: f64, gas_formation_factor: f64) -> f64 {
    gas_produced * gas_formation_factor * MSCF_PER_MMSCF
}

/// Gas still in solution, in reservoir barrels: (OGIP − produced) × Bg × 1000
pub fn solution_gas_produced_rb(
    original_gas_in_place: f64,
    gas_produced: f64,
    gas_formation_factor: f64,
) -> f64 {
    (original_gas_in_place - gas_produced) * gas_formation_factor * MSCF_PER_MMSCF
}

/// Oil produced in reservoir barrels: oil (bbl) × Bo
pub fn oil_produced_rb(oil_produced: f64, oil_formation_factor: f64) -> f64 {
    oil_produced * oil_formation_factor
}

/// Total produced fluid in reservoir barrels
pub fn total_fluid_rb(gas_produced_rb: f64, water_produced: f64, oil_produced_rb: f64) -> f64 {
    gas_produced_rb + water_produced + oil_produced_rb
}

/// Mass of CO2 that fills the produced fluid volume
pub fn total_fluid_mass(total_fluid_rb: f64, co2_density: f64) -> f64 {
    total_fluid_rb * co2_density
}

/// Storage capacity of the field in metric tons
///
/// Gas in place is converted from MMscf to barrels, added to oil in place, and
/// the total converted to cubic metres before dividing by the CO2 density.
pub fn storage_capacity(
    original_oil_in_place: f64,
    original_gas_in_place: f64,
    co2_density: f64,
) -> f64 {
    let original_gas_in_place_bbl = original_gas_in_place * MSCF_PER_MMSCF / CUBIC_FEET_PER_BARREL;
    let total_fluid_bbl = original_oil_in_place + original_gas_in_place_bbl;
    let total_fluid = total_fluid_bbl * CUBIC_METRES_PER_BARREL * 1000.0;
    total_fluid / co2_density
}

/// Inputs of the depleted-field analysis
#[derive(Debug, Clone, PartialEq)]
pub struct DepletedInputs {
    /// bbl
    pub original_oil_in_place: f64,
    /// MMscf
    pub original_gas_in_place: f64,
    /// MMscf
    pub gas_produced: f64,
    /// bbl
    pub oil_produced: f64,
    /// bbl
    pub water_produced: f64,
    /// Bg
    pub gas_formation_factor: f64,
    /// Bo
    pub oil_formation_factor: f64,
    /// kg/m³
    pub co2_density: f64,
}

impl DepletedInputs {
    /// Read every input from `table` using the schema's labels
    pub fn load(table: &DataTable, schema: &DepletedSchema) -> CalcResult<Self> {
        let labels = &schema.labels;
        let required = [
            labels.original_oil_in_place.as_str(),
            labels.original_gas_in_place.as_str(),
            labels.gas_produced.as_str(),
            labels.oil_produced.as_str(),
            labels.water_produced.as_str(),
            labels.gas_formation_factor.as_str(),
            labels.oil_formation_factor.as_str(),
            labels.co2_density.as_str(),
        ];
        let params = load_parameters(table, &schema.layout, &required)?;

        Ok(Self {
            original_oil_in_place: require(&params, &labels.original_oil_in_place)?,
            original_gas_in_place: require(&params, &labels.original_gas_in_place)?,
            gas_produced: require(&params, &labels.gas_produced)?,
            oil_produced: require(&params, &labels.oil_produced)?,
            water_produced: require(&params, &labels.water_produced)?,
            gas_formation_factor: require(&params, &labels.gas_formation_factor)?,
            oil_formation_factor: require(&params, &labels.oil_formation_factor)?,
            co2_density: require(&params, &labels.co2_density)?,
        })
    }
}

/// Run the depleted-field formulas in report order
pub fn evaluate(inputs: &DepletedInputs) -> ResultSet {
    let gas_rb = gas_produced_rb(inputs.gas_produced, inputs.gas_formation_factor);
    let solution_gas_rb = solution_gas_produced_rb(
        inputs.original_gas_in_place,
        inputs.gas_produced,
        inputs.gas_formation_factor,
    );
    let oil_rb = oil_produced_rb(inputs.oil_produced, inputs.oil_formation_factor);
    let total_rb = total_fluid_rb(gas_rb, inputs.water_produced, oil_rb);
    let total_kg = total_fluid_mass(total_rb, inputs.co2_density);
    let capacity = storage_capacity(
        inputs.original_oil_in_place,
        inputs.original_gas_in_place,
        inputs.co2_density,
    );

    let mut results = ResultSet::new("Depleted Field Storage");
    results.push("Gas Produced", gas_rb, Some("Rb"));
    results.push("Solution Gas Produced", solution_gas_rb, Some("Rb"));
    results.push("Reservoir BBL Produced", oil_rb, Some("Rb"));
    results.push("Total Fluid", total_rb, Some("Rb"));
    results.push("Total Fluid Mass", total_kg, Some("kg"));
    results.push("Storage Capacity", capacity, Some("metric tons"));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricValue;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    fn sample() -> DepletedInputs {
        DepletedInputs {
            original_oil_in_place: 1_000_000.0,
            original_gas_in_place: 5000.0,
            gas_produced: 2000.0,
            oil_produced: 400_000.0,
            water_produced: 100_000.0,
            gas_formation_factor: 0.005,
            oil_formation_factor: 1.2,
            co2_density: 700.0,
        }
    }

    #[test]
    fn test_gas_conversions() {
        assert!(close(gas_produced_rb(2000.0, 0.005), 10_000.0));
        assert!(close(solution_gas_produced_rb(5000.0, 2000.0, 0.005), 15_000.0));
        assert_eq!(solution_gas_produced_rb(2000.0, 2000.0, 0.005), 0.0);
    }

    #[test]
    fn test_oil_and_total_fluid() {
        assert!(close(oil_produced_rb(400_000.0, 1.2), 480_000.0));
        assert_eq!(total_fluid_rb(10_000.0, 100_000.0, 480_000.0), 590_000.0);
        assert_eq!(total_fluid_mass(590_000.0, 700.0), 413_000_000.0);
    }

    #[test]
    fn test_storage_capacity() {
        let expected = (1_000_000.0 + 5000.0 * 1000.0 / 5.615) * 0.159 * 1000.0 / 700.0;
        assert!(close(storage_capacity(1_000_000.0, 5000.0, 700.0), expected));
        assert!(close(expected, 429_407.200_101_768_3));
    }

    #[test]
    fn test_storage_capacity_oil_only() {
        // 1 bbl = 159 "kg" at unit density before dividing
        assert!(close(storage_capacity(1.0, 0.0, 1.0), 159.0));
    }

    #[test]
    fn test_evaluate_order_and_values() {
        let results = evaluate(&sample());
        let names: Vec<&str> = results.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Gas Produced",
                "Solution Gas Produced",
                "Reservoir BBL Produced",
                "Total Fluid",
                "Total Fluid Mass",
                "Storage Capacity",
            ]
        );

        match results.get("Total Fluid") {
            Some(MetricValue::Number(v)) => assert!(close(*v, 590_000.0)),
            other => panic!("Unexpected total fluid {other:?}"),
        }
    }
}
