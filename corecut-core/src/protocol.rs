//! JSON bodies exchanged with the dashboard server.

use serde::{Deserialize, Serialize};

use crate::report::{AggregateReport, PerformanceReport};
use crate::savings::{annual_compute_cost, compute_savings, CostParameters, SavingsResult};

/// Health check response from the dashboard server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    /// Create a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Error body returned with any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Which view of the dashboard is currently active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Nothing loaded yet.
    #[default]
    Upload,
    Single,
    Aggregate,
}

/// Response to loading a report document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResponse {
    pub view: View,
    pub machine_count: usize,
}

/// Snapshot of what the dashboard currently holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResponse {
    pub active_view: View,
    pub params: CostParameters,
    /// Machine name of the loaded single report, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_machine: Option<String>,
    /// Number of machines in the loaded aggregate report, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_machine_count: Option<usize>,
}

/// Savings of a single-machine report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsResponse {
    pub machine: String,
    pub gain_percent: f64,
    pub conclusive: bool,
    pub savings: SavingsResult,
    /// Annual execution cost of the baseline variant alone.
    pub baseline_annual_cost: f64,
    /// Annual execution cost of the optimized variant alone.
    pub optimized_annual_cost: f64,
}

impl SavingsResponse {
    pub fn from_report(report: &PerformanceReport, params: &CostParameters) -> Self {
        Self {
            machine: report.machine.clone(),
            gain_percent: report.comparison.gain_percent,
            conclusive: report.comparison.conclusive,
            savings: compute_savings(report, params),
            baseline_annual_cost: annual_compute_cost(report.baseline.stats.median, params),
            optimized_annual_cost: annual_compute_cost(report.optimized.stats.median, params),
        }
    }
}

/// Savings of one machine within an aggregate report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineSavings {
    pub machine: String,
    pub gain_percent: f64,
    pub conclusive: bool,
    pub savings: SavingsResult,
}

/// Savings summed over every machine of an aggregate report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateSavingsResponse {
    pub machine_count: usize,
    pub median_gain: f64,
    pub p10_gain: f64,
    pub p90_gain: f64,
    pub total: SavingsResult,
    pub machines: Vec<MachineSavings>,
}

impl AggregateSavingsResponse {
    pub fn from_aggregate(aggregate: &AggregateReport, params: &CostParameters) -> Self {
        let machines: Vec<MachineSavings> = aggregate
            .reports
            .iter()
            .map(|r| MachineSavings {
                machine: r.machine.clone(),
                gain_percent: r.comparison.gain_percent,
                conclusive: r.comparison.conclusive,
                savings: compute_savings(r, params),
            })
            .collect();
        let total = machines.iter().map(|m| m.savings).sum();

        Self {
            machine_count: aggregate.machine_count,
            median_gain: aggregate.aggregate_stats.median_gain,
            p10_gain: aggregate.aggregate_stats.p10_gain,
            p90_gain: aggregate.aggregate_stats.p90_gain,
            total,
            machines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sample_report;
    use crate::savings::compute_aggregate_savings;

    #[test]
    fn test_health_response_healthy() {
        let response = HealthResponse::healthy();
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_view_serialization() {
        assert_eq!(serde_json::to_string(&View::Aggregate).unwrap(), "\"aggregate\"");
        assert_eq!(View::default(), View::Upload);
    }

    #[test]
    fn test_savings_response_from_report() {
        let params = CostParameters::default();
        let report = sample_report();
        let response = SavingsResponse::from_report(&report, &params);

        assert_eq!(response.machine, "demo-machine");
        assert!(response.conclusive);
        assert_eq!(response.savings, compute_savings(&report, &params));
        assert!(response.baseline_annual_cost > response.optimized_annual_cost);
    }

    #[test]
    fn test_aggregate_response_total_matches_estimator() {
        let params = CostParameters::default();
        let mut second = sample_report();
        second.machine = "second".to_string();
        second.optimized.stats.median = 1000.0;
        let aggregate = AggregateReport::from_reports(vec![sample_report(), second], None);

        let response = AggregateSavingsResponse::from_aggregate(&aggregate, &params);
        let expected = compute_aggregate_savings(&aggregate.reports, &params);

        assert_eq!(response.machine_count, 2);
        assert_eq!(response.machines.len(), 2);
        assert_eq!(response.machines[1].machine, "second");
        assert!((response.total.total - expected.total).abs() < 1e-9);
    }

    #[test]
    fn test_state_response_skips_missing_documents() {
        let response = StateResponse {
            active_view: View::Upload,
            params: CostParameters::default(),
            single_machine: None,
            aggregate_machine_count: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("single_machine"));
        assert!(json.contains("\"active_view\":\"upload\""));
    }
}
