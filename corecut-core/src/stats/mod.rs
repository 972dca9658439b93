use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Summary statistics of one run set, in milliseconds (`cv` in percent).
///
/// Reports carry these pre-computed by the benchmarking tool; the savings
/// estimator reads them as-is and never recomputes them from the runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub mean: f64,
    pub median: f64,
    #[serde(default)]
    pub std_dev: f64,
    /// Coefficient of variation: `std_dev / mean` as a percentage.
    #[serde(default)]
    pub cv: f64,
    #[serde(default)]
    pub p10: f64,
    #[serde(default)]
    pub p90: f64,
    #[serde(default)]
    pub p95: f64,
    #[serde(default)]
    pub p99: f64,
}

impl Stats {
    /// Compute summary statistics over a sample.
    ///
    /// Percentiles use linear interpolation between the two closest ranks of
    /// the sorted sample. The standard deviation is the population one (`n`
    /// denominator). An empty sample yields all zeros.
    pub fn calculate(values: &[f64]) -> Stats {
        if values.is_empty() {
            return Stats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let mean = sorted.iter().mean();
        let std_dev = sorted.iter().population_std_dev();
        let cv = if mean != 0.0 {
            (std_dev / mean) * 100.0
        } else {
            0.0
        };

        Stats {
            count: n,
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median: percentile(&sorted, 50.0),
            std_dev,
            cv,
            p10: percentile(&sorted, 10.0),
            p90: percentile(&sorted, 90.0),
            p95: percentile(&sorted, 95.0),
            p99: percentile(&sorted, 99.0),
        }
    }
}

/// Baseline vs optimized comparison as computed by the benchmarking tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Relative improvement of the optimized median over the baseline median
    /// (positive = optimized is faster).
    pub gain_percent: f64,
    #[serde(default)]
    pub gain_p10: f64,
    #[serde(default)]
    pub gain_p90: f64,
    /// Whether the gain stands out from run-to-run noise.
    #[serde(default)]
    pub conclusive: bool,
    #[serde(default)]
    pub overlap: f64,
}

/// Linear-interpolated percentile of an already sorted sample.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => return 0.0,
        1 => return sorted[0],
        _ => {}
    }

    let idx = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        return sorted[lower];
    }

    let frac = idx - lower as f64;
    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}
