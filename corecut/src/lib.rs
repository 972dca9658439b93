//! corecut: cost, energy and CO2 savings from benchmark comparison reports
//!
//! This library loads baseline vs. optimized reports produced by a
//! benchmarking tool, aggregates them across machines, and estimates what
//! the optimization saves per year under configurable cost parameters.

pub mod aggregate;
pub mod cli;
pub mod config;

// Re-export core types for convenience
pub use corecut_core::protocol;
pub use corecut_core::report::{
    load_document, load_report, parse_document, parse_report, AggregateReport, ParseError,
    PerformanceReport, ReportDocument, ReportError, Reporter, TerminalReporter,
};
pub use corecut_core::savings::{
    compute_aggregate_savings, compute_machine_savings, compute_savings, CostParameters,
    SavingsResult,
};
pub use corecut_server::{run_server, DashboardState};

// Re-export main types from this crate
pub use aggregate::{aggregate_folder, write_aggregate, AggregateError, SkippedReport};
pub use cli::{Cli, Command};
pub use config::Config;
