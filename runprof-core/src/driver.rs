//! Benchmark-entry driver — run the full pipeline for one
//! (function, dimension) record and write the results back onto it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parse::{parse_table, ParseError};
use crate::postprocess::{postprocess, PostprocessConfig, PostprocessError, PostprocessOutput};
use crate::run::ColumnLayout;
use crate::split::{split_table, SplitError};

/// Default scale factor for the evaluation-budget cap: the requested cap is
/// `max_evals_factor × dimension`.
pub const DEFAULT_MAX_EVALS_FACTOR: f64 = 1e5;

/// One (function, dimension) record of a benchmark index: the raw data
/// files to process, the target to reach, and — after processing — the
/// results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub func_id: u32,
    pub dim: u32,
    pub data_files: Vec<PathBuf>,
    /// The function value the runs were asked to reach; processing fails
    /// if absent.
    pub target_func_value: Option<f64>,
    /// Filled in by [`process_entry`].
    pub results: Option<PostprocessOutput>,
}

impl IndexEntry {
    fn label(&self) -> String {
        match self.data_files.first() {
            Some(path) => path.display().to_string(),
            None => format!("entry f{} DIM{}", self.func_id, self.dim),
        }
    }
}

/// Errors from the driver layer.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("the value '{value}' was not found in {filename}")]
    MissingValue { value: String, filename: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error(transparent)]
    Postprocess(#[from] PostprocessError),
}

/// Process one index entry: parse and split every data file, post-process
/// the resulting runs against the entry's target, and store the output on
/// the entry. The requested evaluation cap is `max_evals_factor × dim`.
pub fn process_entry(
    entry: &mut IndexEntry,
    layout: ColumnLayout,
    max_evals_factor: f64,
    cfg: &PostprocessConfig,
) -> Result<(), DriverError> {
    let target = entry
        .target_func_value
        .ok_or_else(|| DriverError::MissingValue {
            value: "target function value".to_string(),
            filename: entry.label(),
        })?;

    let requested_max_evals = max_evals_factor * entry.dim as f64;

    let mut runs = Vec::new();
    for path in &entry.data_files {
        let table = parse_table(path)?;
        runs.extend(split_table(
            &table,
            layout,
            &path.display().to_string(),
        )?);
    }

    entry.results = Some(postprocess(runs, target, requested_max_evals, cfg)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_data(dir: &std::path::Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_target_is_reported_with_the_file() {
        let mut entry = IndexEntry {
            func_id: 1,
            dim: 2,
            data_files: vec![PathBuf::from("data_f1/run0_f1_DIM2.dat")],
            target_func_value: None,
            results: None,
        };
        let err = process_entry(
            &mut entry,
            ColumnLayout::default(),
            DEFAULT_MAX_EVALS_FACTOR,
            &PostprocessConfig::default(),
        )
        .unwrap_err();
        match err {
            DriverError::MissingValue { value, filename } => {
                assert_eq!(value, "target function value");
                assert!(filename.contains("run0_f1_DIM2.dat"));
            }
            other => panic!("expected MissingValue, got {other:?}"),
        }
    }

    #[test]
    fn processes_files_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        // Three runs across two files; fitness in column 2 (default layout).
        let a = write_data(
            dir.path(),
            "a.dat",
            "% fevals best measured\n\
             10 0 8.0\n60 0 0.4\n100 0 1e-9\n\
             12 0 7.0\n70 0 0.3\n150 0 1e-9\n",
        );
        let b = write_data(
            dir.path(),
            "b.dat",
            "15 0 6.0\n80 0 0.5\n200 0 1e-9\n",
        );
        // The second run restarts at 12 < 100, so file `a` splits in two.
        let mut entry = IndexEntry {
            func_id: 3,
            dim: 5,
            data_files: vec![a, b],
            target_func_value: Some(1e-8),
            results: None,
        };
        process_entry(
            &mut entry,
            ColumnLayout::default(),
            DEFAULT_MAX_EVALS_FACTOR,
            &PostprocessConfig::default(),
        )
        .unwrap();

        let out = entry.results.as_ref().unwrap();
        assert_eq!(out.run_count, 3);
        assert_eq!(out.effective_max_evals, 200.0); // observed < 5e5 requested
        assert_eq!(out.sparse_table.len(), 5);
    }

    #[test]
    fn parse_failures_propagate() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_data(dir.path(), "bad.dat", "1 0 oops\n");
        let mut entry = IndexEntry {
            func_id: 1,
            dim: 2,
            data_files: vec![bad],
            target_func_value: Some(1e-8),
            results: None,
        };
        let err = process_entry(
            &mut entry,
            ColumnLayout::default(),
            DEFAULT_MAX_EVALS_FACTOR,
            &PostprocessConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DriverError::Parse(_)));
        assert!(entry.results.is_none());
    }
}
