//! Run records — one optimizer run's trace of (evaluations, best-value-so-far)
//! samples, plus the forward-only cursor the aligner drives down the trace.

use serde::{Deserialize, Serialize};

/// Column indices of the evaluation counter and the fitness value inside a
/// raw data table. Defaults match the BBOB `.dat` layout (evals in column 0,
/// noise-free fitness in column 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub func_evals: usize,
    pub fit_value: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            func_evals: 0,
            fit_value: 2,
        }
    }
}

impl ColumnLayout {
    /// Minimum number of columns a row must have to be readable under this layout.
    pub fn min_columns(&self) -> usize {
        self.func_evals.max(self.fit_value) + 1
    }
}

/// One recorded trace row: evaluation count paired with the best function
/// value seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub evals: f64,
    pub value: f64,
}

/// One independent run: samples sorted by evaluation count, a scan cursor
/// that only moves forward, and the run's own evaluation ceiling (the
/// evaluation count of its last sample).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    samples: Vec<Sample>,
    cursor: usize,
    observed_max_evals: f64,
}

impl RunRecord {
    /// Build a run from a non-empty sample list. Returns `None` for an empty
    /// list; the splitter never produces empty segments.
    pub fn new(samples: Vec<Sample>) -> Option<Self> {
        let last = samples.last()?;
        let observed_max_evals = last.evals;
        Some(Self {
            samples,
            cursor: 0,
            observed_max_evals,
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sample under the cursor.
    pub fn current(&self) -> Sample {
        self.samples[self.cursor]
    }

    pub fn at_last_sample(&self) -> bool {
        self.cursor == self.samples.len() - 1
    }

    /// Move the cursor one sample forward. No-op at the last sample.
    pub fn advance(&mut self) {
        if !self.at_last_sample() {
            self.cursor += 1;
        }
    }

    /// Evaluation count of the last sample; immutable once constructed.
    pub fn observed_max_evals(&self) -> f64 {
        self.observed_max_evals
    }
}
