//! Bootstrap statistics — percentiles, the SP1 runtime estimator, and
//! resampling-based confidence bounds.
//!
//! Key design choices:
//! - Percentiles use MATLAB-style plotting positions `100·(k+0.5)/n` with
//!   linear interpolation, clamped at the extremes. The median of three
//!   elements is the middle element.
//! - SP1 counts a run successful iff its evaluation count is strictly below
//!   the cap, then divides the mean successful cost by the success rate, so
//!   failed restarts inflate the expected cost instead of vanishing.
//! - Resampling draws with replacement from a seeded `StdRng`; identical
//!   seeds yield identical bounds (a tested property).

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for bootstrap resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResampleConfig {
    /// Number of bootstrap resamples.
    pub resamples: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            resamples: 15,
            seed: 42,
        }
    }
}

/// SP1 estimate: expected evaluations to reach a target, restarts included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sp1Estimate {
    /// Mean cost of successful runs divided by the success rate;
    /// infinite when nothing succeeded.
    pub expected_evals: f64,
    /// Fraction of runs strictly below the cap.
    pub success_rate: f64,
    /// Number of successful runs.
    pub successes: usize,
}

/// The p-th percentile of `data` (p in [0, 100]); sorts an owned copy.
pub fn percentile(data: &[f64], p: f64) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    percentile_sorted(&sorted, p)
}

/// The p-th percentile of already-sorted `data`.
///
/// Plotting positions are `100·(k+0.5)/n`; values between positions are
/// linearly interpolated, values outside clamp to the extremes. Returns NaN
/// on empty input.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * n as f64 - 0.5;
    if rank <= 0.0 {
        return sorted[0];
    }
    if rank >= (n - 1) as f64 {
        return sorted[n - 1];
    }
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;
    if frac == 0.0 {
        // Exact position; skipping the interpolation keeps infinite entries
        // (failed-run estimates) from turning into NaN.
        return sorted[lo];
    }
    sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
}

/// SP1 runtime estimator over per-run evaluation counts.
///
/// Success means `x < max_evals` (strictly); NaN entries are dropped before
/// anything is counted. With no successes the estimate is infinite and the
/// success rate zero.
pub fn sp1(data: &[f64], max_evals: f64) -> Sp1Estimate {
    let clean: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    let succ: Vec<f64> = clean.iter().copied().filter(|&x| x < max_evals).collect();
    if succ.is_empty() {
        return Sp1Estimate {
            expected_evals: f64::INFINITY,
            success_rate: 0.0,
            successes: 0,
        };
    }
    let rate = succ.len() as f64 / clean.len() as f64;
    let mean = succ.iter().sum::<f64>() / succ.len() as f64;
    Sp1Estimate {
        expected_evals: mean / rate,
        success_rate: rate,
        successes: succ.len(),
    }
}

/// Resampling-based bounds on a statistic.
///
/// Draws `cfg.resamples` bootstrap samples of `data` (same size, with
/// replacement), applies `statistic` to each, and returns the requested
/// percentiles of the resampled distribution, one per entry of
/// `percentiles`. Empty input yields NaN bounds.
pub fn resample_bounds<F>(
    data: &[f64],
    percentiles: &[f64],
    cfg: &ResampleConfig,
    statistic: F,
) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let n = data.len();
    if n == 0 || cfg.resamples == 0 {
        return vec![f64::NAN; percentiles.len()];
    }
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut draw = vec![0.0; n];
    let mut stats = Vec::with_capacity(cfg.resamples);
    for _ in 0..cfg.resamples {
        for slot in draw.iter_mut() {
            *slot = data[rng.gen_range(0..n)];
        }
        stats.push(statistic(&draw));
    }
    stats.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    percentiles
        .iter()
        .map(|&p| percentile_sorted(&stats, p))
        .collect()
}
