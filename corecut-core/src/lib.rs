//! Core types and utilities for corecut.
//!
//! This crate holds the report model shared by the corecut CLI and the
//! dashboard server, the validation step that turns report JSON into typed
//! reports, and the savings estimator itself.

pub mod protocol;
pub mod report;
pub mod savings;
pub mod stats;

// Re-export main types for convenience
pub use report::{
    load_document, load_report, parse_aggregate, parse_document, parse_report, sample_report,
    AggregateReport, AggregateStats, ParseError, PerformanceReport, ReportConfig, ReportDocument,
    ReportError, Reporter, Run, RunSet, TerminalReporter,
};
pub use savings::{
    annual_compute_cost, compute_aggregate_savings, compute_machine_savings, compute_savings,
    savings_from_medians, CostParameters, SavingsResult, CO2_KG_PER_KWH,
};
pub use stats::{Comparison, Stats};
