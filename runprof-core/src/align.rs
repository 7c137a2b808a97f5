//! Threshold-ladder alignment — advance every run's cursor in lockstep
//! against a geometrically decaying sequence of target-value levels.
//!
//! The ladder is the clock: each step lowers the level by a fifth of a
//! decade and asks every run "how many evaluations did you need to first
//! get this close to the target?". Runs never rewind; a finished run keeps
//! reporting its final evaluation count for as long as the scan lives.
//!
//! Key design choices:
//! - Comparison happens on *offsets* (`value - target + offset_floor`), so
//!   a run that hits the target exactly still carries a positive offset.
//! - The ladder starts on the 0.2-decade grid at or above all observed
//!   offsets, and never below the top canonical value, so canonical values
//!   (powers of ten) land exactly on ladder steps.
//! - A run counts as finished only once the ladder has descended below the
//!   best offset it ever reached; until then its final sample keeps
//!   crossing thresholds, which is what it in fact did.

use serde::{Deserialize, Serialize};

use crate::run::RunRecord;

/// Step sizes and tolerances of the threshold ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LadderConfig {
    /// Multiplicative decay per ladder step; five steps per decade.
    pub decay: f64,
    /// Relative tolerance of the crossing test (one ladder step's width).
    pub relative_step: f64,
    /// Absolute floor of the crossing test near zero.
    pub float_resolution: f64,
    /// Added to every value-target difference so exact hits stay positive.
    pub offset_floor: f64,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            decay: 10f64.powf(-0.2),
            relative_step: 1.0 - 10f64.powf(-0.1),
            float_resolution: 1e-15,
            offset_floor: 1e-8,
        }
    }
}

impl LadderConfig {
    /// Has the ladder, standing at `current`, crossed canonical `value`?
    ///
    /// Relative-tolerance test sized to one ladder step, with an absolute
    /// floor near zero; fires exactly once per value as the ladder decays.
    pub fn crossed(&self, current: f64, value: f64) -> bool {
        current - value < (current * self.relative_step).max(self.float_resolution)
    }
}

/// Snapshot of all runs at one ladder step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderStep {
    /// The level this step stood at.
    pub threshold: f64,
    /// Evaluation count per run, in run order.
    pub evals: Vec<f64>,
}

/// Lockstep scan of several runs down the threshold ladder.
#[derive(Debug)]
pub struct ThresholdScan<'a> {
    runs: &'a mut [RunRecord],
    target_value: f64,
    start_floor: f64,
    cfg: LadderConfig,
    /// Infinity until the first step initializes the ladder.
    current: f64,
    finished: Vec<bool>,
    evals: Vec<f64>,
    offsets: Vec<f64>,
}

impl<'a> ThresholdScan<'a> {
    /// `start_floor` is the lowest allowed starting level (the top canonical
    /// value); the ladder never starts below it.
    pub fn new(
        runs: &'a mut [RunRecord],
        target_value: f64,
        start_floor: f64,
        cfg: LadderConfig,
    ) -> Self {
        let n = runs.len();
        Self {
            runs,
            target_value,
            start_floor,
            cfg,
            current: f64::INFINITY,
            finished: vec![false; n],
            evals: vec![0.0; n],
            offsets: vec![0.0; n],
        }
    }

    pub fn all_finished(&self) -> bool {
        self.finished.iter().all(|&f| f)
    }

    /// Current ladder level; infinite before the first step.
    pub fn threshold(&self) -> f64 {
        self.current
    }

    /// Advance every unfinished run against the current level and return
    /// the step snapshot. The first call initializes the ladder from the
    /// largest observed offset, rounded up to the 0.2-decade grid.
    pub fn step(&mut self) -> LadderStep {
        for (i, run) in self.runs.iter_mut().enumerate() {
            self.evals[i] = run.current().evals;
            self.offsets[i] = run.current().value - self.target_value + self.cfg.offset_floor;
            if !self.finished[i] {
                while !run.at_last_sample() && self.offsets[i] > self.current {
                    run.advance();
                    self.evals[i] = run.current().evals;
                    self.offsets[i] =
                        run.current().value - self.target_value + self.cfg.offset_floor;
                }
                // Exhausted only once the ladder has passed everything the
                // run ever reached.
                if run.at_last_sample() && self.offsets[i] > self.current {
                    self.finished[i] = true;
                }
            }
        }

        if self.current.is_infinite() {
            let top = self
                .offsets
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            // f64::max discards the NaN a non-positive offset would produce,
            // leaving the canonical floor.
            self.current = self
                .start_floor
                .max(10f64.powf((top.log10() * 5.0).ceil() / 5.0));
        }

        let step = LadderStep {
            threshold: self.current,
            evals: self.evals.clone(),
        };
        self.current *= self.cfg.decay;
        step
    }
}

/// Everything one alignment pass produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedScan {
    /// One snapshot per ladder step visited, thresholds strictly decreasing.
    pub steps: Vec<LadderStep>,
    /// First-crossing snapshot per value of interest, in sequence order.
    pub interest_hits: Vec<Option<Vec<f64>>>,
    /// First-crossing snapshot per data-profile value, in sequence order.
    pub profile_hits: Vec<Option<Vec<f64>>>,
}

/// Run the full alignment pass: scan the ladder while any run is live and
/// values of interest remain, capturing a snapshot at every step plus the
/// first crossing of each canonical value.
///
/// Both canonical sequences must be strictly descending; the single-pass
/// matching depends on it (callers validate).
pub fn align_runs(
    runs: &mut [RunRecord],
    target_value: f64,
    values_of_interest: &[f64],
    values_for_profile: &[f64],
    cfg: &LadderConfig,
) -> AlignedScan {
    let start_floor = values_of_interest
        .first()
        .copied()
        .unwrap_or(f64::NEG_INFINITY);
    let mut scan = ThresholdScan::new(runs, target_value, start_floor, *cfg);

    let mut steps = Vec::new();
    let mut interest_hits: Vec<Option<Vec<f64>>> = vec![None; values_of_interest.len()];
    let mut profile_hits: Vec<Option<Vec<f64>>> = vec![None; values_for_profile.len()];
    let mut i_interest = 0;
    let mut i_profile = 0;

    while !scan.all_finished() && i_interest < values_of_interest.len() {
        let step = scan.step();

        if i_interest < values_of_interest.len()
            && cfg.crossed(step.threshold, values_of_interest[i_interest])
        {
            interest_hits[i_interest] = Some(step.evals.clone());
            i_interest += 1;
        }
        if i_profile < values_for_profile.len()
            && cfg.crossed(step.threshold, values_for_profile[i_profile])
        {
            profile_hits[i_profile] = Some(step.evals.clone());
            i_profile += 1;
        }

        steps.push(step);
    }

    AlignedScan {
        steps,
        interest_hits,
        profile_hits,
    }
}
