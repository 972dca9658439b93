//! Validation of report JSON into typed reports.
//!
//! Anything that fails here is a rejected report; the savings estimator only
//! ever sees documents whose baseline and optimized medians are present and
//! finite.

use std::io;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use super::{AggregateReport, PerformanceReport};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON, or a required field is missing or has the wrong type.
    #[error("Invalid report JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Report document must be a JSON object")]
    NotAnObject,

    #[error("Invalid {side} median for machine '{machine}': {value}")]
    InvalidMedian {
        machine: String,
        side: &'static str,
        value: f64,
    },

    #[error("Aggregate declares {declared} machines but contains {actual} reports")]
    MachineCountMismatch { declared: usize, actual: usize },
}

/// A validated report of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportDocument {
    Single(PerformanceReport),
    Aggregate(AggregateReport),
}

impl ReportDocument {
    /// All single-machine reports contained in this document.
    pub fn reports(&self) -> &[PerformanceReport] {
        match self {
            ReportDocument::Single(report) => std::slice::from_ref(report),
            ReportDocument::Aggregate(aggregate) => &aggregate.reports,
        }
    }
}

/// Parse and validate a single-machine report.
pub fn parse_report(json: &str) -> Result<PerformanceReport, ParseError> {
    let report: PerformanceReport = serde_json::from_str(json)?;
    validate_report(&report)?;
    Ok(report)
}

/// Parse and validate a multi-machine aggregate report.
pub fn parse_aggregate(json: &str) -> Result<AggregateReport, ParseError> {
    let aggregate: AggregateReport = serde_json::from_str(json)?;
    validate_aggregate(&aggregate)?;
    Ok(aggregate)
}

/// Parse a document, telling single and aggregate reports apart by the
/// presence of a top-level `reports` array.
pub fn parse_document(json: &str) -> Result<ReportDocument, ParseError> {
    let value: Value = serde_json::from_str(json)?;
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;

    if object.get("reports").is_some_and(Value::is_array) {
        let aggregate: AggregateReport = serde_json::from_value(value)?;
        validate_aggregate(&aggregate)?;
        Ok(ReportDocument::Aggregate(aggregate))
    } else {
        let report: PerformanceReport = serde_json::from_value(value)?;
        validate_report(&report)?;
        Ok(ReportDocument::Single(report))
    }
}

/// Read and validate a single-machine report file.
pub fn load_report(path: &Path) -> Result<PerformanceReport, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_report(&content)
}

/// Read and validate a report file of either kind.
pub fn load_document(path: &Path) -> Result<ReportDocument, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_document(&content)
}

fn validate_report(report: &PerformanceReport) -> Result<(), ParseError> {
    for (side, median) in [
        ("baseline", report.baseline.stats.median),
        ("optimized", report.optimized.stats.median),
    ] {
        if !median.is_finite() {
            return Err(ParseError::InvalidMedian {
                machine: report.machine.clone(),
                side,
                value: median,
            });
        }
    }
    Ok(())
}

fn validate_aggregate(aggregate: &AggregateReport) -> Result<(), ParseError> {
    if aggregate.machine_count != aggregate.reports.len() {
        return Err(ParseError::MachineCountMismatch {
            declared: aggregate.machine_count,
            actual: aggregate.reports.len(),
        });
    }
    for report in &aggregate.reports {
        validate_report(report)?;
    }
    Ok(())
}
