//! Typed model of the JSON reports produced by the benchmarking tool, and
//! the reporters that present savings derived from them.

use std::io;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::savings::SavingsResult;
use crate::stats::{Comparison, Stats};

mod parse;
mod sample;
mod terminal;

pub use parse::{
    load_document, load_report, parse_aggregate, parse_document, parse_report, ParseError,
    ReportDocument,
};
pub use sample::sample_report;
pub use terminal::TerminalReporter;

/// Version written into aggregate reports built by this crate.
pub const AGGREGATE_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One measured execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub duration_ms: f64,
    pub exit_code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput: Option<f64>,
}

impl Run {
    pub fn new(duration_ms: f64, exit_code: i32) -> Self {
        Self {
            duration_ms,
            exit_code,
            error: None,
            throughput: None,
        }
    }
}

/// The runs of one variant together with their pre-computed statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSet {
    #[serde(default)]
    pub runs: Vec<Run>,
    pub stats: Stats,
}

/// How the benchmarking tool was configured when it produced a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub baseline_script: String,
    pub optimized_script: String,
    pub mode: String,
    pub warmup_runs: u32,
    pub measured_runs: u32,
    pub alternate: bool,
    pub cooldown_ms: u64,
    pub timeout: u64,
}

/// Baseline vs optimized measurements from a single machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub machine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ReportConfig>,
    pub baseline: RunSet,
    pub optimized: RunSet,
    pub comparison: Comparison,
}

/// Distribution of the per-machine gain percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub median_gain: f64,
    #[serde(default)]
    pub mean_gain: f64,
    #[serde(default)]
    pub std_dev_gain: f64,
    pub p10_gain: f64,
    pub p90_gain: f64,
    #[serde(default)]
    pub min_gain: f64,
    #[serde(default)]
    pub max_gain: f64,
}

impl AggregateStats {
    /// Summarise gain percentages across machines.
    pub fn from_gains(gains: &[f64]) -> Self {
        let stats = Stats::calculate(gains);
        Self {
            median_gain: stats.median,
            mean_gain: stats.mean,
            std_dev_gain: stats.std_dev,
            p10_gain: stats.p10,
            p90_gain: stats.p90,
            min_gain: stats.min,
            max_gain: stats.max,
        }
    }
}

/// Reports from several machines, each compared on its own hardware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub machine_count: usize,
    pub reports: Vec<PerformanceReport>,
    pub aggregate_stats: AggregateStats,
}

impl AggregateReport {
    /// Build an aggregate from single-machine reports.
    ///
    /// Only gain percentages are combined; raw timings from different
    /// machines are never compared with each other.
    pub fn from_reports(
        reports: Vec<PerformanceReport>,
        generated_at: Option<DateTime<Utc>>,
    ) -> Self {
        let gains: Vec<f64> = reports.iter().map(|r| r.comparison.gain_percent).collect();

        Self {
            version: Some(AGGREGATE_VERSION.to_string()),
            generated_at,
            machine_count: reports.len(),
            aggregate_stats: AggregateStats::from_gains(&gains),
            reports,
        }
    }
}

/// Presents savings estimates to the user.
pub trait Reporter: Send + Sync {
    fn report_single(
        &self,
        report: &PerformanceReport,
        savings: &SavingsResult,
    ) -> Result<(), ReportError>;

    fn report_aggregate(
        &self,
        aggregate: &AggregateReport,
        per_machine: &[(&str, SavingsResult)],
        total: &SavingsResult,
    ) -> Result<(), ReportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with_gain(machine: &str, gain: f64) -> PerformanceReport {
        let mut report = sample_report();
        report.machine = machine.to_string();
        report.comparison.gain_percent = gain;
        report
    }

    #[test]
    fn test_from_reports_stats() {
        let aggregate = AggregateReport::from_reports(
            vec![
                report_with_gain("a", 10.0),
                report_with_gain("b", 30.0),
                report_with_gain("c", 20.0),
            ],
            None,
        );

        assert_eq!(aggregate.machine_count, 3);
        assert_eq!(aggregate.version.as_deref(), Some(AGGREGATE_VERSION));
        assert_eq!(aggregate.aggregate_stats.median_gain, 20.0);
        assert_eq!(aggregate.aggregate_stats.min_gain, 10.0);
        assert_eq!(aggregate.aggregate_stats.max_gain, 30.0);
        assert!((aggregate.aggregate_stats.p10_gain - 12.0).abs() < 1e-9);
        assert!((aggregate.aggregate_stats.p90_gain - 28.0).abs() < 1e-9);
        // Reports keep their original order
        assert_eq!(aggregate.reports[0].machine, "a");
        assert_eq!(aggregate.reports[2].machine, "c");
    }

    #[test]
    fn test_from_reports_empty() {
        let aggregate = AggregateReport::from_reports(Vec::new(), None);
        assert_eq!(aggregate.machine_count, 0);
        assert_eq!(aggregate.aggregate_stats, AggregateStats::default());
    }

    #[test]
    fn test_optional_fields_skipped() {
        let mut report = sample_report();
        report.tag = None;
        report.config = None;
        let json = serde_json::to_value(&report).unwrap();

        assert!(json.get("tag").is_none());
        assert!(json.get("config").is_none());
        assert!(json.get("machine").is_some());
    }
}
