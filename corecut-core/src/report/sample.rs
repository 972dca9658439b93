use chrono::{TimeZone, Utc};

use super::{PerformanceReport, ReportConfig, Run, RunSet};
use crate::stats::{Comparison, Stats};

const BASELINE_RUNS_MS: [f64; 9] = [
    1250.0, 1180.0, 1320.0, 1200.0, 1280.0, 1150.0, 1300.0, 1220.0, 1190.0,
];
const OPTIMIZED_RUNS_MS: [f64; 9] = [
    850.0, 820.0, 880.0, 840.0, 860.0, 810.0, 870.0, 830.0, 845.0,
];

/// A demo report for trying out the dashboard without a real benchmark run.
pub fn sample_report() -> PerformanceReport {
    PerformanceReport {
        version: Some("1.0".to_string()),
        generated_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).single(),
        machine: "demo-machine".to_string(),
        tag: Some("v1.0.0".to_string()),
        config: Some(ReportConfig {
            baseline_script: "./baseline.sh".to_string(),
            optimized_script: "./optimized.sh".to_string(),
            mode: "duration".to_string(),
            warmup_runs: 1,
            measured_runs: 9,
            alternate: true,
            cooldown_ms: 500,
            timeout: 300,
        }),
        baseline: RunSet {
            runs: BASELINE_RUNS_MS.iter().map(|&ms| Run::new(ms, 0)).collect(),
            stats: Stats {
                median: 1220.0,
                mean: 1232.0,
                std_dev: 55.0,
                cv: 4.5,
                p10: 1160.0,
                p90: 1310.0,
                ..Stats::default()
            },
        },
        optimized: RunSet {
            runs: OPTIMIZED_RUNS_MS.iter().map(|&ms| Run::new(ms, 0)).collect(),
            stats: Stats {
                median: 845.0,
                mean: 845.0,
                std_dev: 22.0,
                cv: 2.6,
                p10: 815.0,
                p90: 875.0,
                ..Stats::default()
            },
        },
        comparison: Comparison {
            gain_percent: 30.74,
            gain_p10: 28.5,
            gain_p90: 33.2,
            conclusive: true,
            overlap: 0.05,
        },
    }
}
