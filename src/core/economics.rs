//! Discounted cash-flow economics
//!
//! Cash flows are indexed by project year. Year 0 holds the (negative) capital
//! outlay; later years hold revenue minus operating cost.

use crate::config::EconomicSchema;
use crate::error::{CalcError, CalcResult};
use crate::table::load_series;
use crate::types::{DataTable, ResultSet};
use tracing::debug;

/// Net present value: Σ cfᵢ / (1 + rate)ⁱ, with i starting at 0
pub fn npv(cash_flows: &[f64], discount_rate: f64) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(i, cf)| cf / (1.0 + discount_rate).powi(i as i32))
        .sum()
}

/// d(NPV)/d(rate)
fn npv_derivative(cash_flows: &[f64], rate: f64) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, cf)| -(i as f64) * cf / (1.0 + rate).powi(i as i32 + 1))
        .sum()
}

fn has_sign_change(cash_flows: &[f64]) -> bool {
    let mut signs = cash_flows
        .iter()
        .filter(|cf| **cf != 0.0)
        .map(|cf| cf.is_sign_positive());
    match signs.next() {
        Some(first) => signs.any(|s| s != first),
        None => false,
    }
}

/// Newton iteration on NPV(rate) = 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrSolver {
    /// Starting rate
    pub seed: f64,
    /// Convergence threshold on the step size
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for IrrSolver {
    fn default() -> Self {
        Self {
            seed: 0.1,
            tolerance: 1.48e-8,
            max_iterations: 50,
        }
    }
}

impl IrrSolver {
    /// Find the rate at which the cash flows' NPV is zero
    ///
    /// Newton steps from `seed`. When the slope vanishes or a step leaves the
    /// domain (rate ≤ -1), the root is bracketed on (-1, ∞) and bisected.
    /// Fails with [`CalcError::NoSolution`] when the flows never change sign,
    /// no bracket exists, or the iteration limit is hit.
    pub fn solve(&self, cash_flows: &[f64]) -> CalcResult<f64> {
        if !has_sign_change(cash_flows) {
            return Err(CalcError::NoSolution(
                "IRR undefined: cash flows never change sign".to_string(),
            ));
        }

        let mut rate = self.seed;
        for iteration in 0..self.max_iterations {
            let value = npv(cash_flows, rate);
            let slope = npv_derivative(cash_flows, rate);

            if slope == 0.0 || !slope.is_finite() {
                debug!(rate, iteration, "irr slope vanished, bisecting");
                return bisect(cash_flows);
            }

            let next = rate - value / slope;
            if !next.is_finite() || next <= -1.0 {
                debug!(rate = next, iteration, "irr step left (-1, inf), bisecting");
                return bisect(cash_flows);
            }

            if (next - rate).abs() < self.tolerance {
                debug!(iterations = iteration + 1, rate = next, "irr converged");
                return Ok(next);
            }
            rate = next;
        }

        Err(CalcError::NoSolution(format!(
            "IRR failed to converge after {} iterations",
            self.max_iterations
        )))
    }
}

/// Largest upper bracket tried: 2^40 (a rate of ~10^12)
const MAX_BRACKET_DOUBLINGS: i32 = 40;

/// Closest lower bracket tried: -1 + 10^-15
const MAX_BRACKET_DECADES: i32 = 15;

const BISECTION_ITERATIONS: usize = 200;

/// Find rates on either side of a root of NPV
///
/// NPV at 0 is the plain sum. Losing projects have their root below 0, so the
/// search walks toward -1; profitable ones walk up by doubling.
fn bracket(cash_flows: &[f64]) -> Option<(f64, f64)> {
    let at_zero = npv(cash_flows, 0.0);
    let opposite = |rate: f64| {
        let value = npv(cash_flows, rate);
        value.is_finite() && value != 0.0 && value.is_sign_positive() != at_zero.is_sign_positive()
    };

    if at_zero < 0.0 {
        (1..=MAX_BRACKET_DECADES)
            .map(|k| -1.0 + 10f64.powi(-k))
            .find(|&rate| opposite(rate))
            .map(|rate| (rate, 0.0))
    } else {
        (0..=MAX_BRACKET_DOUBLINGS)
            .map(|k| 2f64.powi(k))
            .find(|&rate| opposite(rate))
            .map(|rate| (0.0, rate))
    }
}

/// Bisection on a sign-changing bracket down to adjacent floats
fn bisect(cash_flows: &[f64]) -> CalcResult<f64> {
    if npv(cash_flows, 0.0) == 0.0 {
        return Ok(0.0);
    }
    let (mut low, mut high) = bracket(cash_flows).ok_or_else(|| {
        CalcError::NoSolution("IRR undefined: no rate above -100% zeroes the NPV".to_string())
    })?;
    let low_positive = npv(cash_flows, low).is_sign_positive();

    for _ in 0..BISECTION_ITERATIONS {
        let mid = 0.5 * (low + high);
        if mid <= low || mid >= high {
            break;
        }
        let value = npv(cash_flows, mid);
        if value == 0.0 {
            return Ok(mid);
        }
        if value.is_sign_positive() == low_positive {
            low = mid;
        } else {
            high = mid;
        }
    }

    let rate = 0.5 * (low + high);
    debug!(rate, "irr bisected");
    Ok(rate)
}

/// Internal rate of return, seeded at 10%
pub fn irr(cash_flows: &[f64]) -> CalcResult<f64> {
    IrrSolver::default().solve(cash_flows)
}

/// First year at which the cumulative cash flow is non-negative
///
/// `None` if the project never breaks even.
pub fn years_to_breakeven(cash_flows: &[f64]) -> Option<usize> {
    let mut cumulative = 0.0;
    for (year, cf) in cash_flows.iter().enumerate() {
        cumulative += cf;
        if cumulative >= 0.0 {
            return Some(year);
        }
    }
    None
}

/// NPV of the flows after year 0 (rebased to start at index 0), divided by
/// the year-0 outlay
pub fn profitability_index(cash_flows: &[f64], discount_rate: f64) -> CalcResult<f64> {
    let (first, rest) = cash_flows.split_first().ok_or_else(|| {
        CalcError::Validation("profitability index needs at least one cash flow".to_string())
    })?;
    let initial_investment = -first;
    Ok(npv(rest, discount_rate) / initial_investment)
}

/// Build the cash-flow sequence: year 0 is −capex, later years revenue − opex
pub fn cash_flows(revenue: &[f64], capex: &[f64], opex: &[f64]) -> CalcResult<Vec<f64>> {
    let years = revenue.len();
    if capex.len() != years || opex.len() != years {
        return Err(CalcError::Validation(format!(
            "Revenue, Capex and Opex must cover the same years ({}, {}, {})",
            revenue.len(),
            capex.len(),
            opex.len()
        )));
    }

    Ok((0..years)
        .map(|year| {
            if year == 0 {
                -capex[year]
            } else {
                revenue[year] - opex[year]
            }
        })
        .collect())
}

/// Inputs of the economic analysis
#[derive(Debug, Clone, PartialEq)]
pub struct EconomicInputs {
    pub revenue: Vec<f64>,
    pub capex: Vec<f64>,
    pub opex: Vec<f64>,
    pub discount_rate: f64,
}

impl EconomicInputs {
    /// Read `project_life_years` values of each series from `table`
    pub fn load(
        table: &DataTable,
        schema: &EconomicSchema,
        project_life_years: usize,
        discount_rate: f64,
    ) -> CalcResult<Self> {
        let labels = &schema.labels;
        Ok(Self {
            revenue: load_series(table, &schema.layout, &labels.revenue, project_life_years)?,
            capex: load_series(table, &schema.layout, &labels.capex, project_life_years)?,
            opex: load_series(table, &schema.layout, &labels.opex, project_life_years)?,
            discount_rate,
        })
    }

    pub fn cash_flows(&self) -> CalcResult<Vec<f64>> {
        cash_flows(&self.revenue, &self.capex, &self.opex)
    }
}

/// NPV, IRR, breakeven year and profitability index
pub fn evaluate(inputs: &EconomicInputs) -> CalcResult<ResultSet> {
    let flows = inputs.cash_flows()?;
    debug!(?flows, rate = inputs.discount_rate, "cash flows");

    let net_present_value = npv(&flows, inputs.discount_rate);
    let internal_rate = irr(&flows)?;
    let breakeven = years_to_breakeven(&flows);
    let pi = profitability_index(&flows, inputs.discount_rate)?;

    let mut results = ResultSet::new("Economic Analysis");
    results.push("NPV", net_present_value, None);
    results.push("IRR", internal_rate, None);
    results.push_years("Years to Breakeven", breakeven);
    results.push("Profitability Index", pi, None);
    Ok(results)
}
