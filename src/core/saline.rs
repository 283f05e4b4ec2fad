//! Saline aquifer storage
//!
//! Storage efficiency, CO2 plume radius and area, reservoir pressure and the
//! brine/CO2 density contrast. The plume radius has several published
//! correlations; each is a separate function and [`RadiusMethod`] names them so
//! callers can pick which ones to report.

use crate::config::SalineSchema;
use crate::error::{CalcError, CalcResult};
use crate::table::{load_parameters, require};
use crate::types::{DataTable, ResultSet};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Seconds in a Julian year
const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;

/// Depth-to-feet factor applied before the pressure gradient
const DEPTH_TO_FEET: f64 = 2.28084;

/// Square metres per square mile (rounded)
const SQUARE_METRES_PER_SQUARE_MILE: f64 = 2.59e6;

/// Storage efficiency is reported per unit area
const UNIT_AREA: f64 = 1.0;

/// Empirical scaling factors of the Dong & Duan / Nordbotten correlations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmpiricalFactors {
    /// Leading coefficient (η)
    pub eta: f64,
    /// Mobility coefficient (γ), applied inside the fourth root
    pub gamma: f64,
}

impl Default for EmpiricalFactors {
    fn default() -> Self {
        Self {
            eta: 1.0,
            gamma: 1.0,
        }
    }
}

/// Storage efficiency of a flat aquifer, in percent
///
/// Product of permeability, injection time, thickness, porosity and CO2
/// relative permeability over a unit area.
pub fn storage_efficiency_no_dip(
    permeability: f64,
    injection_time: f64,
    reservoir_thickness: f64,
    porosity: f64,
    co2_relative_permeability: f64,
) -> f64 {
    let efficiency = (permeability
        * injection_time
        * reservoir_thickness
        * porosity
        * co2_relative_permeability)
        / UNIT_AREA;
    efficiency * 100.0
}

/// Storage efficiency of a dipping aquifer, in percent
///
/// Same product as [`storage_efficiency_no_dip`] scaled by sin(dip). A flat
/// layer (0°) therefore gives 0.
pub fn storage_efficiency_with_dip(
    permeability: f64,
    injection_time: f64,
    reservoir_thickness: f64,
    porosity: f64,
    co2_relative_permeability: f64,
    dip_angle_degrees: f64,
) -> f64 {
    let efficiency = (permeability
        * injection_time
        * reservoir_thickness
        * porosity
        * co2_relative_permeability
        * dip_angle_degrees.to_radians().sin())
        / UNIT_AREA;
    efficiency * 100.0
}

/// Injection rate in m³/s from MMt/yr
fn volumetric_rate(injection_rate: f64) -> f64 {
    injection_rate * 1e6 / SECONDS_PER_YEAR
}

/// η·(γ·k/φ)^¼·√Q
fn fourth_root_correlation(
    injection_rate: f64,
    permeability: f64,
    porosity: f64,
    factors: &EmpiricalFactors,
) -> f64 {
    let q = volumetric_rate(injection_rate);
    factors.eta * (factors.gamma * permeability / porosity).powf(0.25) * q.sqrt()
}

/// Plume radius in metres after Dong & Duan
pub fn radius_dong_duan(
    injection_rate: f64,
    permeability: f64,
    porosity: f64,
    factors: &EmpiricalFactors,
) -> f64 {
    fourth_root_correlation(injection_rate, permeability, porosity, factors)
}

/// Plume radius in metres after Nordbotten
pub fn radius_nordbotten(
    injection_rate: f64,
    permeability: f64,
    porosity: f64,
    factors: &EmpiricalFactors,
) -> f64 {
    fourth_root_correlation(injection_rate, permeability, porosity, factors)
}

/// Plume radius in metres from a pressure-diffusion balance
///
/// √(rate·μ / (π·k·h·Δp)) with Δp the reservoir pressure at depth.
pub fn radius_pressure_diffusion(
    injection_rate: f64,
    viscosity: f64,
    permeability: f64,
    reservoir_thickness: f64,
    pressure_gradient: f64,
    reservoir_depth: f64,
) -> f64 {
    let delta_pressure = reservoir_pressure(reservoir_depth, pressure_gradient);
    (injection_rate * viscosity / (PI * permeability * reservoir_thickness * delta_pressure))
        .sqrt()
}

/// Plume radius in metres after Dong: √(rate·t / (φ·h·k))
pub fn radius_dong(
    injection_rate: f64,
    injection_time: f64,
    porosity: f64,
    reservoir_thickness: f64,
    permeability: f64,
) -> f64 {
    (injection_rate * injection_time / (porosity * reservoir_thickness * permeability)).sqrt()
}

/// Plume area in square miles from a radius in metres
pub fn area_from_radius(radius: f64) -> f64 {
    PI * radius.powi(2) / SQUARE_METRES_PER_SQUARE_MILE
}

/// Reservoir pressure in psi from depth and gradient (psi/ft)
pub fn reservoir_pressure(reservoir_depth: f64, pressure_gradient: f64) -> f64 {
    let reservoir_depth_ft = reservoir_depth * DEPTH_TO_FEET;
    pressure_gradient * reservoir_depth_ft
}

/// Density contrast between formation water and CO2
pub fn density_differential(co2_density: f64, water_density: f64) -> f64 {
    water_density - co2_density
}

//==============================================================================
// Radius estimators
//==============================================================================

/// Named plume-radius correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RadiusMethod {
    DongDuan,
    Nordbotten,
    Dong,
    PressureDiffusion,
}

impl RadiusMethod {
    pub const ALL: [RadiusMethod; 4] = [
        RadiusMethod::DongDuan,
        RadiusMethod::Nordbotten,
        RadiusMethod::Dong,
        RadiusMethod::PressureDiffusion,
    ];

    /// Methods reported when the caller selects none
    pub fn defaults() -> &'static [RadiusMethod] {
        &[
            RadiusMethod::DongDuan,
            RadiusMethod::Dong,
            RadiusMethod::Nordbotten,
        ]
    }

    /// Identifier used on the command line and in config files
    pub fn key(&self) -> &'static str {
        match self {
            RadiusMethod::DongDuan => "dong-duan",
            RadiusMethod::Nordbotten => "nordbotten",
            RadiusMethod::Dong => "dong",
            RadiusMethod::PressureDiffusion => "pressure-diffusion",
        }
    }

    /// Name used in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            RadiusMethod::DongDuan => "Dong and Duan",
            RadiusMethod::Nordbotten => "Nordbotten",
            RadiusMethod::Dong => "Dong",
            RadiusMethod::PressureDiffusion => "Pressure Diffusion",
        }
    }

    /// Whether the method needs a CO2 viscosity input
    pub fn needs_viscosity(&self) -> bool {
        matches!(self, RadiusMethod::PressureDiffusion)
    }

    /// Plume radius in metres
    pub fn estimate(&self, inputs: &SalineInputs, factors: &EmpiricalFactors) -> CalcResult<f64> {
        let radius = match self {
            RadiusMethod::DongDuan => radius_dong_duan(
                inputs.injection_rate,
                inputs.permeability,
                inputs.porosity,
                factors,
            ),
            RadiusMethod::Nordbotten => radius_nordbotten(
                inputs.injection_rate,
                inputs.permeability,
                inputs.porosity,
                factors,
            ),
            RadiusMethod::Dong => radius_dong(
                inputs.injection_rate,
                inputs.injection_time,
                inputs.porosity,
                inputs.reservoir_thickness,
                inputs.permeability,
            ),
            RadiusMethod::PressureDiffusion => {
                let viscosity = inputs.co2_viscosity.ok_or_else(|| {
                    CalcError::Validation(
                        "pressure-diffusion radius needs a CO2 viscosity value".to_string(),
                    )
                })?;
                radius_pressure_diffusion(
                    inputs.injection_rate,
                    viscosity,
                    inputs.permeability,
                    inputs.reservoir_thickness,
                    inputs.pressure_gradient,
                    inputs.reservoir_depth,
                )
            }
        };
        Ok(radius)
    }
}

impl fmt::Display for RadiusMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RadiusMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RadiusMethod::ALL
            .iter()
            .copied()
            .find(|m| m.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let keys: Vec<&str> = RadiusMethod::ALL.iter().map(|m| m.key()).collect();
                format!("unknown radius method '{}' (expected one of: {})", s, keys.join(", "))
            })
    }
}

//==============================================================================
// Analysis
//==============================================================================

/// Inputs of the saline-aquifer analysis
#[derive(Debug, Clone, PartialEq)]
pub struct SalineInputs {
    /// MMt/yr
    pub injection_rate: f64,
    /// m
    pub reservoir_thickness: f64,
    /// years
    pub injection_time: f64,
    pub porosity: f64,
    /// m
    pub reservoir_depth: f64,
    /// psi/ft
    pub pressure_gradient: f64,
    /// degrees
    pub reservoir_angle: f64,
    /// mD
    pub permeability: f64,
    pub co2_relative_permeability: f64,
    /// kg/m³
    pub co2_density: f64,
    /// kg/m³
    pub water_density: f64,
    pub co2_viscosity: Option<f64>,
}

impl SalineInputs {
    /// Read the inputs needed for `methods` from `table`
    ///
    /// The viscosity label is only required when a selected method uses it.
    pub fn load(
        table: &DataTable,
        schema: &SalineSchema,
        methods: &[RadiusMethod],
    ) -> CalcResult<Self> {
        let labels = &schema.labels;
        let mut required = vec![
            labels.injection_rate.as_str(),
            labels.reservoir_thickness.as_str(),
            labels.injection_time.as_str(),
            labels.porosity.as_str(),
            labels.reservoir_depth.as_str(),
            labels.pressure_gradient.as_str(),
            labels.reservoir_angle.as_str(),
            labels.permeability.as_str(),
            labels.co2_relative_permeability.as_str(),
            labels.co2_density.as_str(),
            labels.water_density.as_str(),
        ];
        let wants_viscosity = methods.iter().any(RadiusMethod::needs_viscosity);
        if wants_viscosity {
            required.push(labels.co2_viscosity.as_str());
        }

        let params = load_parameters(table, &schema.layout, &required)?;

        Ok(Self {
            injection_rate: require(&params, &labels.injection_rate)?,
            reservoir_thickness: require(&params, &labels.reservoir_thickness)?,
            injection_time: require(&params, &labels.injection_time)?,
            porosity: require(&params, &labels.porosity)?,
            reservoir_depth: require(&params, &labels.reservoir_depth)?,
            pressure_gradient: require(&params, &labels.pressure_gradient)?,
            reservoir_angle: require(&params, &labels.reservoir_angle)?,
            permeability: require(&params, &labels.permeability)?,
            co2_relative_permeability: require(&params, &labels.co2_relative_permeability)?,
            co2_density: require(&params, &labels.co2_density)?,
            water_density: require(&params, &labels.water_density)?,
            co2_viscosity: if wants_viscosity {
                Some(require(&params, &labels.co2_viscosity)?)
            } else {
                None
            },
        })
    }
}

/// Run the saline formulas, then one radius/area pair per method
pub fn evaluate(
    inputs: &SalineInputs,
    methods: &[RadiusMethod],
    factors: &EmpiricalFactors,
) -> CalcResult<ResultSet> {
    let mut results = ResultSet::new("Saline Storage");

    results.push(
        "Storage Efficiency without Dip",
        storage_efficiency_no_dip(
            inputs.permeability,
            inputs.injection_time,
            inputs.reservoir_thickness,
            inputs.porosity,
            inputs.co2_relative_permeability,
        ),
        Some("%"),
    );
    results.push(
        "Storage Efficiency with Dip",
        storage_efficiency_with_dip(
            inputs.permeability,
            inputs.injection_time,
            inputs.reservoir_thickness,
            inputs.porosity,
            inputs.co2_relative_permeability,
            inputs.reservoir_angle,
        ),
        Some("%"),
    );
    results.push(
        "Reservoir Pressure",
        reservoir_pressure(inputs.reservoir_depth, inputs.pressure_gradient),
        Some("psi"),
    );
    results.push(
        "Density Differential",
        density_differential(inputs.co2_density, inputs.water_density),
        Some("kg/m^3"),
    );

    for method in methods {
        let radius = method.estimate(inputs, factors)?;
        let name = method.display_name();
        results.push(format!("Radius ({} method)", name), radius, Some("meters"));
        results.push(
            format!("Area ({} method)", name),
            area_from_radius(radius),
            Some("square miles"),
        );
    }

    Ok(results)
}
