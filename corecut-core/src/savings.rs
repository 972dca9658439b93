//! Savings estimation: turns baseline/optimized medians into annual time,
//! cost, energy and CO2 figures.
//!
//! Everything here is a pure function of a report and a set of
//! [`CostParameters`]. Inputs are not validated: negative or zero parameters
//! propagate arithmetically, and a slower "optimized" variant yields negative
//! savings rather than an error.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::report::{AggregateReport, PerformanceReport};

/// Emission factor of the electricity grid, in kg of CO2 per kWh.
pub const CO2_KG_PER_KWH: f64 = 0.4;

const MS_PER_SECOND: f64 = 1000.0;
const SECONDS_PER_HOUR: f64 = 3600.0;
const WH_PER_KWH: f64 = 1000.0;

/// User-adjustable parameters that convert execution time into money and energy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostParameters {
    /// Cost of one hour of execution time (currency/hour).
    pub hourly_rate: f64,
    /// Price of electricity (currency/kWh).
    pub electricity_price: f64,
    /// Power draw of the server while executing (watts).
    pub server_watts: f64,
    pub executions_per_day: f64,
    pub working_days_per_year: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            hourly_rate: 50.0,
            electricity_price: 0.25,
            server_watts: 150.0,
            executions_per_day: 1000.0,
            working_days_per_year: 250.0,
        }
    }
}

/// Annual impact of switching from the baseline to the optimized variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsResult {
    pub annual_time_saved_hours: f64,
    pub annual_cost_savings: f64,
    pub annual_energy_saved_kwh: f64,
    pub annual_electricity_savings: f64,
    pub annual_co2_saved_kg: f64,
    /// `annual_cost_savings + annual_electricity_savings`.
    pub total: f64,
}

impl SavingsResult {
    pub fn monthly_cost_savings(&self) -> f64 {
        self.annual_cost_savings / 12.0
    }

    pub fn monthly_co2_saved_kg(&self) -> f64 {
        self.annual_co2_saved_kg / 12.0
    }
}

impl Add for SavingsResult {
    type Output = SavingsResult;

    fn add(self, rhs: SavingsResult) -> SavingsResult {
        SavingsResult {
            annual_time_saved_hours: self.annual_time_saved_hours + rhs.annual_time_saved_hours,
            annual_cost_savings: self.annual_cost_savings + rhs.annual_cost_savings,
            annual_energy_saved_kwh: self.annual_energy_saved_kwh + rhs.annual_energy_saved_kwh,
            annual_electricity_savings: self.annual_electricity_savings
                + rhs.annual_electricity_savings,
            annual_co2_saved_kg: self.annual_co2_saved_kg + rhs.annual_co2_saved_kg,
            total: self.total + rhs.total,
        }
    }
}

impl AddAssign for SavingsResult {
    fn add_assign(&mut self, rhs: SavingsResult) {
        *self = *self + rhs;
    }
}

impl Sum for SavingsResult {
    fn sum<I: Iterator<Item = SavingsResult>>(iter: I) -> SavingsResult {
        iter.fold(SavingsResult::default(), Add::add)
    }
}

/// Estimate the annual savings of one report.
///
/// Only `baseline.stats.median` and `optimized.stats.median` take part in the
/// computation.
pub fn compute_savings(report: &PerformanceReport, params: &CostParameters) -> SavingsResult {
    savings_from_medians(
        report.baseline.stats.median,
        report.optimized.stats.median,
        params,
    )
}

/// Estimate annual savings from the two medians (milliseconds).
pub fn savings_from_medians(
    baseline_ms: f64,
    optimized_ms: f64,
    params: &CostParameters,
) -> SavingsResult {
    let time_saved_ms = baseline_ms - optimized_ms;
    let time_saved_per_exec_sec = time_saved_ms / MS_PER_SECOND;

    let daily_time_saved_hours =
        time_saved_per_exec_sec * params.executions_per_day / SECONDS_PER_HOUR;
    let annual_time_saved_hours = daily_time_saved_hours * params.working_days_per_year;
    let annual_cost_savings = annual_time_saved_hours * params.hourly_rate;

    let energy_saved_per_exec_wh =
        energy_per_execution_wh(baseline_ms, params) - energy_per_execution_wh(optimized_ms, params);
    let annual_energy_saved_kwh = energy_saved_per_exec_wh
        * params.executions_per_day
        * params.working_days_per_year
        / WH_PER_KWH;
    let annual_electricity_savings = annual_energy_saved_kwh * params.electricity_price;
    let annual_co2_saved_kg = annual_energy_saved_kwh * CO2_KG_PER_KWH;

    SavingsResult {
        annual_time_saved_hours,
        annual_cost_savings,
        annual_energy_saved_kwh,
        annual_electricity_savings,
        annual_co2_saved_kg,
        total: annual_cost_savings + annual_electricity_savings,
    }
}

/// Sum of [`compute_savings`] over every report. Empty input yields zeros.
pub fn compute_aggregate_savings(
    reports: &[PerformanceReport],
    params: &CostParameters,
) -> SavingsResult {
    reports.iter().map(|r| compute_savings(r, params)).sum()
}

/// Per-machine savings of an aggregate report, in report order.
pub fn compute_machine_savings<'a>(
    aggregate: &'a AggregateReport,
    params: &CostParameters,
) -> Vec<(&'a str, SavingsResult)> {
    aggregate
        .reports
        .iter()
        .map(|r| (r.machine.as_str(), compute_savings(r, params)))
        .collect()
}

/// Annual execution cost of a single variant with the given median.
pub fn annual_compute_cost(median_ms: f64, params: &CostParameters) -> f64 {
    (median_ms / MS_PER_SECOND / SECONDS_PER_HOUR)
        * params.executions_per_day
        * params.working_days_per_year
        * params.hourly_rate
}

/// Energy drawn by one execution, in watt-hours.
fn energy_per_execution_wh(duration_ms: f64, params: &CostParameters) -> f64 {
    (duration_ms / MS_PER_SECOND / SECONDS_PER_HOUR) * params.server_watts
}
