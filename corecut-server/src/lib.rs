//! HTTP dashboard backend for corecut.
//!
//! The server keeps the dashboard's state (loaded reports and cost
//! parameters) in an explicit [`DashboardState`] and answers savings queries
//! by recomputing them from that state on every request.

mod server;

pub use server::{build_router, run_server, run_server_async};

use corecut_core::protocol::{AggregateSavingsResponse, SavingsResponse, StateResponse, View};
use corecut_core::{AggregateReport, CostParameters, PerformanceReport, ReportDocument};

/// Everything the dashboard currently holds.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub params: CostParameters,
    pub single: Option<PerformanceReport>,
    pub aggregate: Option<AggregateReport>,
    pub active_view: View,
}

impl DashboardState {
    /// Create a dashboard state with the given cost parameters and nothing loaded.
    pub fn new(params: CostParameters) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Replace the loaded document of the matching kind and switch to its view.
    ///
    /// Returns the number of machines in the loaded document.
    pub fn load(&mut self, document: ReportDocument) -> usize {
        match document {
            ReportDocument::Single(report) => {
                self.single = Some(report);
                self.active_view = View::Single;
                1
            }
            ReportDocument::Aggregate(aggregate) => {
                let count = aggregate.reports.len();
                self.aggregate = Some(aggregate);
                self.active_view = View::Aggregate;
                count
            }
        }
    }

    /// Savings of the loaded single report, if any.
    pub fn single_savings(&self) -> Option<SavingsResponse> {
        self.single
            .as_ref()
            .map(|report| SavingsResponse::from_report(report, &self.params))
    }

    /// Savings of the loaded aggregate report, if any.
    pub fn aggregate_savings(&self) -> Option<AggregateSavingsResponse> {
        self.aggregate
            .as_ref()
            .map(|aggregate| AggregateSavingsResponse::from_aggregate(aggregate, &self.params))
    }

    pub fn snapshot(&self) -> StateResponse {
        StateResponse {
            active_view: self.active_view,
            params: self.params,
            single_machine: self.single.as_ref().map(|r| r.machine.clone()),
            aggregate_machine_count: self.aggregate.as_ref().map(|a| a.reports.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corecut_core::sample_report;

    #[test]
    fn test_state_new() {
        let state = DashboardState::new(CostParameters::default());
        assert_eq!(state.active_view, View::Upload);
        assert!(state.single_savings().is_none());
        assert!(state.aggregate_savings().is_none());
    }

    #[test]
    fn test_load_single_switches_view() {
        let mut state = DashboardState::default();
        let count = state.load(ReportDocument::Single(sample_report()));

        assert_eq!(count, 1);
        assert_eq!(state.active_view, View::Single);
        assert_eq!(state.snapshot().single_machine.as_deref(), Some("demo-machine"));
    }

    #[test]
    fn test_load_aggregate_keeps_single() {
        let mut state = DashboardState::default();
        state.load(ReportDocument::Single(sample_report()));
        let aggregate = AggregateReport::from_reports(vec![sample_report(), sample_report()], None);
        let count = state.load(ReportDocument::Aggregate(aggregate));

        assert_eq!(count, 2);
        assert_eq!(state.active_view, View::Aggregate);
        assert!(state.single.is_some());
        assert_eq!(state.snapshot().aggregate_machine_count, Some(2));
    }

    #[test]
    fn test_savings_follow_params() {
        let mut state = DashboardState::default();
        state.load(ReportDocument::Single(sample_report()));
        let before = state.single_savings().unwrap().savings.total;

        state.params.executions_per_day *= 2.0;
        let after = state.single_savings().unwrap().savings.total;

        assert!((after - before * 2.0).abs() < 1e-6);
    }
}
