//! Integration tests for corecut.
//!
//! These tests go from report files on disk through validation and
//! aggregation to savings figures, the same path the CLI takes.

use std::fs;
use std::path::Path;

use corecut::{
    aggregate_folder, compute_aggregate_savings, compute_machine_savings, compute_savings,
    load_document, write_aggregate, AggregateError, Config, CostParameters, ReportDocument,
    TerminalReporter,
};
use corecut_core::sample_report;
use tempfile::TempDir;

fn write_machine_report(dir: &Path, machine: &str, baseline_ms: f64, optimized_ms: f64) {
    let mut report = sample_report();
    report.machine = machine.to_string();
    report.baseline.stats.median = baseline_ms;
    report.optimized.stats.median = optimized_ms;
    report.comparison.gain_percent = (baseline_ms - optimized_ms) / baseline_ms * 100.0;

    let path = dir.join(format!("{}.json", machine));
    fs::write(path, serde_json::to_string_pretty(&report).unwrap()).unwrap();
}

/// Aggregate savings over a folder equal the sum of each machine's savings.
#[test]
fn test_folder_aggregate_matches_per_machine_sum() {
    let dir = TempDir::new().unwrap();
    write_machine_report(dir.path(), "m1", 1220.0, 845.0);
    write_machine_report(dir.path(), "m2", 900.0, 600.0);
    write_machine_report(dir.path(), "m3", 400.0, 450.0);

    let params = CostParameters::default();
    let (aggregate, skipped) = aggregate_folder(dir.path()).unwrap();
    assert!(skipped.is_empty());
    assert_eq!(aggregate.machine_count, 3);

    let total = compute_aggregate_savings(&aggregate.reports, &params);
    let summed: f64 = compute_machine_savings(&aggregate, &params)
        .iter()
        .map(|(_, s)| s.total)
        .sum();
    assert!((total.total - summed).abs() < 1e-9);

    // m3 got slower; its contribution is negative and not clamped
    let m3 = aggregate.reports.iter().find(|r| r.machine == "m3").unwrap();
    assert!(compute_savings(m3, &params).total < 0.0);
}

/// The written aggregate loads back as an aggregate document.
#[test]
fn test_written_aggregate_loads_as_document() {
    let reports = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_machine_report(reports.path(), "alpha", 1000.0, 800.0);
    write_machine_report(reports.path(), "beta", 1000.0, 700.0);

    let (aggregate, _) = aggregate_folder(reports.path()).unwrap();
    let path = write_aggregate(&aggregate, out.path()).unwrap();

    match load_document(&path).unwrap() {
        ReportDocument::Aggregate(loaded) => {
            assert_eq!(loaded.machine_count, 2);
            assert_eq!(loaded.reports, aggregate.reports);
            assert!((loaded.aggregate_stats.median_gain - 25.0).abs() < 1e-9);
        }
        other => panic!("expected aggregate document, got {:?}", other),
    }
}

/// Config-file parameters flow into the estimator.
#[test]
fn test_config_parameters_drive_savings() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join(".corecut.toml");
    fs::write(
        &config_path,
        "[cost]\nexecutions_per_day = 2000.0\nworking_days_per_year = 500.0\n",
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    let report = sample_report();

    let base = compute_savings(&report, &CostParameters::default());
    let scaled = compute_savings(&report, &config.cost_parameters());
    assert!((scaled.total - base.total * 4.0).abs() < 1e-6);
    assert!((scaled.annual_co2_saved_kg - base.annual_co2_saved_kg * 4.0).abs() < 1e-9);
}

/// An invalid report is rejected by the loader rather than estimated.
#[test]
fn test_invalid_report_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    fs::write(
        &path,
        r#"{ "machine": "m", "baseline": { "stats": {} }, "optimized": { "stats": { "median": 1 } } }"#,
    )
    .unwrap();

    assert!(load_document(&path).is_err());
    assert!(matches!(
        aggregate_folder(dir.path()),
        Err(AggregateError::NoValidReports(_))
    ));
}

/// The terminal reporter renders an aggregate loaded from disk.
#[test]
fn test_terminal_report_for_folder() {
    let dir = TempDir::new().unwrap();
    write_machine_report(dir.path(), "runner-a", 1220.0, 845.0);
    write_machine_report(dir.path(), "runner-b", 1220.0, 845.0);

    let params = CostParameters::default();
    let (aggregate, _) = aggregate_folder(dir.path()).unwrap();
    let per_machine = compute_machine_savings(&aggregate, &params);
    let total = compute_aggregate_savings(&aggregate.reports, &params);

    let mut buffer = Vec::new();
    TerminalReporter::without_colors()
        .write_aggregate(&mut buffer, &aggregate, &per_machine, &total)
        .unwrap();
    let output = String::from_utf8(buffer).unwrap();

    assert!(output.contains("runner-a"));
    assert!(output.contains("runner-b"));
    // Two identical machines: 2 x 1303.06
    assert!(output.contains("+2606 €"));
}
