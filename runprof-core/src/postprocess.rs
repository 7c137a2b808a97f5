//! Orchestration — drive the ladder scan over a set of runs and assemble
//! the dense table, the sparse table, and the data-profile map.
//!
//! One `postprocess` call owns its runs for the call's duration; nothing
//! mutable crosses the call boundary. Dense rows aggregate against each
//! run's own ceiling (`observed max + 1`) so plotted curves reflect real
//! run extents; sparse rows aggregate against the effective cap shared
//! with the rest of the experiment. A value of interest the scan never
//! reached gets a sentinel row with success count zero — absence of data
//! is never reported as success.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::{compute_values, AggregateError};
use crate::align::{align_runs, LadderConfig};
use crate::run::RunRecord;
use crate::stats::ResampleConfig;

/// Canonical target-value offsets at which dispersion-bearing rows are
/// captured. Must stay sorted descending.
pub const DEFAULT_VALUES_OF_INTEREST: [f64; 5] = [1.0, 1e-2, 1e-4, 1e-6, 1e-8];

/// Canonical offsets at which data-profile snapshots are captured.
pub const DEFAULT_VALUES_FOR_DATA_PROFILE: [f64; 5] = [1.0, 1e-2, 1e-4, 1e-6, 1e-8];

/// Everything one `postprocess` call needs beyond the runs themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostprocessConfig {
    /// Strictly descending; one sparse-table row per entry.
    pub values_of_interest: Vec<f64>,
    /// Strictly descending; one data-profile snapshot per entry.
    pub values_for_data_profile: Vec<f64>,
    pub ladder: LadderConfig,
    pub resample: ResampleConfig,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            values_of_interest: DEFAULT_VALUES_OF_INTEREST.to_vec(),
            values_for_data_profile: DEFAULT_VALUES_FOR_DATA_PROFILE.to_vec(),
            ladder: LadderConfig::default(),
            resample: ResampleConfig::default(),
        }
    }
}

/// Errors from orchestration.
#[derive(Debug, Error)]
pub enum PostprocessError {
    #[error("no runs to postprocess")]
    NoRuns,

    #[error("canonical value sequences must be strictly descending")]
    UnsortedTargets,

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// The three output tables plus the aggregate scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostprocessOutput {
    /// One row per ladder step: `[threshold, SP1, success rate, order stats…]`.
    pub full_table: Vec<Vec<f64>>,
    /// One row per value of interest: `[value, SP1, 10%, 90%, #succ,
    /// order stats…]`, or the sentinel row for values never reached.
    pub sparse_table: Vec<Vec<f64>>,
    /// Crossed data-profile values with their raw run-order evaluation
    /// counts, descending by value.
    pub data_profile: Vec<(f64, Vec<f64>)>,
    pub run_count: usize,
    /// `min(requested cap, largest observed per-run ceiling)`.
    pub effective_max_evals: f64,
}

impl PostprocessOutput {
    /// Data-profile snapshot for one canonical value, if it was crossed.
    pub fn profile_at(&self, value: f64) -> Option<&[f64]> {
        self.data_profile
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, evals)| evals.as_slice())
    }
}

fn strictly_descending(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] > w[1])
}

/// "Never reached": infinite cost estimate and bounds, zero successes, all
/// evaluation-derived fields pinned to the cap.
fn sentinel_row(value: f64, max_evals: f64) -> Vec<f64> {
    vec![
        value,
        f64::INFINITY,
        f64::INFINITY,
        f64::INFINITY,
        0.0,
        max_evals,
        max_evals,
        max_evals,
        max_evals,
        max_evals,
    ]
}

/// Post-process a set of runs against one target value.
///
/// Aligns every run down the threshold ladder, aggregates each step into a
/// dense row, captures dispersion-bearing rows at the values of interest,
/// and snapshots raw evaluation counts at the data-profile values. Needs at
/// least three runs (the aggregator's order statistics require rank-3
/// access; see [`crate::aggregate::MIN_RUNS`]).
pub fn postprocess(
    mut runs: Vec<RunRecord>,
    target_value: f64,
    requested_max_evals: f64,
    cfg: &PostprocessConfig,
) -> Result<PostprocessOutput, PostprocessError> {
    if runs.is_empty() {
        return Err(PostprocessError::NoRuns);
    }
    if !strictly_descending(&cfg.values_of_interest)
        || !strictly_descending(&cfg.values_for_data_profile)
    {
        return Err(PostprocessError::UnsortedTargets);
    }

    let observed_max = runs
        .iter()
        .map(RunRecord::observed_max_evals)
        .fold(f64::NEG_INFINITY, f64::max);
    let effective_max_evals = requested_max_evals.min(observed_max);

    let scan = align_runs(
        &mut runs,
        target_value,
        &cfg.values_of_interest,
        &cfg.values_for_data_profile,
        &cfg.ladder,
    );

    let mut full_table = Vec::with_capacity(scan.steps.len());
    for step in &scan.steps {
        let mut row = Vec::with_capacity(8);
        row.push(step.threshold);
        row.extend(compute_values(
            &step.evals,
            observed_max + 1.0,
            false,
            &cfg.resample,
        )?);
        full_table.push(row);
    }

    let mut sparse_table = Vec::with_capacity(cfg.values_of_interest.len());
    for (i, &value) in cfg.values_of_interest.iter().enumerate() {
        match &scan.interest_hits[i] {
            Some(evals) => {
                // Distinct but reproducible resampling stream per row.
                let row_cfg = ResampleConfig {
                    seed: cfg.resample.seed.wrapping_add(i as u64),
                    ..cfg.resample
                };
                let mut row = Vec::with_capacity(10);
                row.push(value);
                row.extend(compute_values(evals, effective_max_evals, true, &row_cfg)?);
                sparse_table.push(row);
            }
            None => sparse_table.push(sentinel_row(value, effective_max_evals)),
        }
    }

    let data_profile = cfg
        .values_for_data_profile
        .iter()
        .zip(scan.profile_hits)
        .filter_map(|(&value, hit)| hit.map(|evals| (value, evals)))
        .collect();

    Ok(PostprocessOutput {
        full_table,
        sparse_table,
        data_profile,
        run_count: runs.len(),
        effective_max_evals,
    })
}
