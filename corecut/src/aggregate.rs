//! Aggregation of per-machine reports found in a folder.
//!
//! Each machine compares baseline and optimized on its own hardware; only
//! the resulting gain percentages are combined across machines.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use corecut_core::{load_report, AggregateReport, PerformanceReport};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name of the aggregate written next to the reports. Never read back
/// as an input report.
pub const AGGREGATE_FILE_NAME: &str = "aggregate.json";

/// Errors that can occur while aggregating a report folder.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("No JSON reports found in {0}")]
    NoReportFiles(PathBuf),

    #[error("No valid reports loaded from {0}")]
    NoValidReports(PathBuf),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize aggregate report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A report file that was found but could not be used.
#[derive(Debug, Clone)]
pub struct SkippedReport {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of loading a set of report files.
#[derive(Debug, Default)]
pub struct LoadedReports {
    pub reports: Vec<PerformanceReport>,
    pub skipped: Vec<SkippedReport>,
}

/// Recursively collect `*.json` files under `dir`, sorted by path.
///
/// Files named [`AGGREGATE_FILE_NAME`] are excluded.
pub fn collect_report_files(dir: &Path) -> Result<Vec<PathBuf>, AggregateError> {
    let mut files = Vec::new();
    walk(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), AggregateError> {
    let io_err = |source| AggregateError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        // file_type() does not follow symlinks
        let file_type = entry.file_type().map_err(io_err)?;
        if file_type.is_symlink() {
            if path.is_dir() {
                warn!(path = %path.display(), "not following symlinked directory");
            } else if is_report_file(&path) {
                files.push(path);
            }
        } else if file_type.is_dir() {
            walk(&path, files)?;
        } else if is_report_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_report_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
        && path
            .file_name()
            .is_some_and(|name| name != AGGREGATE_FILE_NAME)
}

/// Load every file as a single-machine report, skipping the invalid ones.
pub fn load_reports(files: &[PathBuf]) -> LoadedReports {
    let mut loaded = LoadedReports::default();

    for path in files {
        match load_report(path) {
            Ok(report) => {
                info!(
                    file = %path.display(),
                    machine = %report.machine,
                    gain = report.comparison.gain_percent,
                    "loaded report"
                );
                loaded.reports.push(report);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping report");
                loaded.skipped.push(SkippedReport {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    loaded
}

/// Build an aggregate from all valid reports under `dir`.
///
/// Returns the aggregate together with the files that were skipped.
pub fn aggregate_folder(
    dir: &Path,
) -> Result<(AggregateReport, Vec<SkippedReport>), AggregateError> {
    let files = collect_report_files(dir)?;
    if files.is_empty() {
        return Err(AggregateError::NoReportFiles(dir.to_path_buf()));
    }
    debug!(count = files.len(), dir = %dir.display(), "found report files");

    let loaded = load_reports(&files);
    if loaded.reports.is_empty() {
        return Err(AggregateError::NoValidReports(dir.to_path_buf()));
    }

    let aggregate = AggregateReport::from_reports(loaded.reports, Some(Utc::now()));
    Ok((aggregate, loaded.skipped))
}

/// Write the aggregate as pretty JSON into `out_dir`, returning the file path.
pub fn write_aggregate(
    aggregate: &AggregateReport,
    out_dir: &Path,
) -> Result<PathBuf, AggregateError> {
    let path = out_dir.join(AGGREGATE_FILE_NAME);
    let json = serde_json::to_string_pretty(aggregate)?;

    fs::create_dir_all(out_dir).map_err(|source| AggregateError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, json).map_err(|source| AggregateError::Io {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}
