//! Per-threshold aggregation — turn the per-run evaluation counts collected
//! at one alignment point into a fixed-shape statistics row.
//!
//! Two row shapes share a common tail of order statistics:
//! - without dispersion: `[SP1, success rate]` — one row per ladder step,
//!   cheap enough to compute for every plotted point.
//! - with dispersion: `[SP1, 10% bound, 90% bound, successes]` — bootstrap
//!   bounds, computed only at the canonical values of interest.
//!
//! The tail is `[best, 3rd best, median, 3rd worst, worst]`, so at least
//! three runs must reach the alignment point; fewer is an error, never an
//! out-of-bounds index.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::{percentile_sorted, resample_bounds, sp1, ResampleConfig};

/// Percentiles bounding the bootstrap dispersion of the SP1 estimate.
pub const DISPERSION_PERCENTILES: [f64; 2] = [10.0, 90.0];

/// Minimum number of runs for the rank-3 order statistics to exist.
pub const MIN_RUNS: usize = 3;

/// Errors from aggregation.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("order statistics need at least {MIN_RUNS} runs, got {got}")]
    InsufficientSamples { got: usize },
}

/// Aggregate per-run evaluation counts at one alignment point.
///
/// Sorts an owned copy of `evals`, runs the SP1 estimator against
/// `max_evals`, optionally adds bootstrap dispersion bounds, and appends
/// the five order statistics. Requires at least [`MIN_RUNS`] entries.
pub fn compute_values(
    evals: &[f64],
    max_evals: f64,
    dispersion: bool,
    resample_cfg: &ResampleConfig,
) -> Result<Vec<f64>, AggregateError> {
    if evals.len() < MIN_RUNS {
        return Err(AggregateError::InsufficientSamples { got: evals.len() });
    }
    let mut n = evals.to_vec();
    n.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let est = sp1(&n, max_evals);
    let mut row = if dispersion {
        let bounds = resample_bounds(&n, &DISPERSION_PERCENTILES, resample_cfg, |s| {
            sp1(s, max_evals).expected_evals
        });
        vec![
            est.expected_evals,
            bounds[0],
            bounds[1],
            est.successes as f64,
        ]
    } else {
        vec![est.expected_evals, est.success_rate]
    };

    let len = n.len();
    row.extend([
        n[0],
        n[2],
        percentile_sorted(&n, 50.0),
        n[len - 3],
        n[len - 1],
    ]);
    Ok(row)
}

// ─── Column metadata ────────────────────────────────────────────────

/// Numeric rendering of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberFormat {
    /// `1.5e2` style.
    Scientific,
    /// Plain integer.
    Integer,
}

/// Label and format of one column of a dispersion-bearing table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub format: NumberFormat,
}

impl ColumnSpec {
    /// Render one value under this column's format.
    pub fn render(&self, value: f64) -> String {
        match self.format {
            NumberFormat::Scientific => format!("{value:.1e}"),
            NumberFormat::Integer => {
                if value.is_finite() {
                    format!("{}", value as i64)
                } else {
                    format!("{value}")
                }
            }
        }
    }
}

const SPARSE_COLUMNS: [ColumnSpec; 10] = [
    ColumnSpec {
        label: "f_t",
        format: NumberFormat::Scientific,
    },
    ColumnSpec {
        label: "ENFEs",
        format: NumberFormat::Scientific,
    },
    ColumnSpec {
        label: "10%",
        format: NumberFormat::Scientific,
    },
    ColumnSpec {
        label: "90%",
        format: NumberFormat::Scientific,
    },
    ColumnSpec {
        label: "#succ",
        format: NumberFormat::Integer,
    },
    ColumnSpec {
        label: "best",
        format: NumberFormat::Scientific,
    },
    ColumnSpec {
        label: "3rd best",
        format: NumberFormat::Scientific,
    },
    ColumnSpec {
        label: "median",
        format: NumberFormat::Scientific,
    },
    ColumnSpec {
        label: "3rd worst",
        format: NumberFormat::Scientific,
    },
    ColumnSpec {
        label: "worst",
        format: NumberFormat::Scientific,
    },
];

/// Column labels and formats for one sparse-table row (threshold column
/// included). Pure metadata; no computation.
pub fn sparse_columns() -> &'static [ColumnSpec; 10] {
    &SPARSE_COLUMNS
}
