//! Run splitting — cut concatenated restart traces into individual runs.
//!
//! Loggers append restarts to the same file, so one raw table may hold
//! several runs back to back. The evaluation counter is monotone within a
//! run; every position where it decreases marks the start of a new run.
//! Boundaries come from a single difference scan over the counter column.

use thiserror::Error;

use crate::run::{ColumnLayout, RunRecord, Sample};

/// Errors from run splitting.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("{source_name}: row {row} has {found} columns, need at least {needed}")]
    MalformedInput {
        source_name: String,
        row: usize,
        found: usize,
        needed: usize,
    },
}

/// Split one raw table into runs. A table with a monotone evaluation column
/// (including a single-row table) yields exactly one run.
///
/// `source_name` labels the table in error messages.
pub fn split_table(
    table: &[Vec<f64>],
    layout: ColumnLayout,
    source_name: &str,
) -> Result<Vec<RunRecord>, SplitError> {
    let needed = layout.min_columns();
    let mut samples = Vec::with_capacity(table.len());
    for (row, cols) in table.iter().enumerate() {
        if cols.len() < needed {
            return Err(SplitError::MalformedInput {
                source_name: source_name.to_string(),
                row,
                found: cols.len(),
                needed,
            });
        }
        samples.push(Sample {
            evals: cols[layout.func_evals],
            value: cols[layout.fit_value],
        });
    }

    // Difference scan: a boundary sits wherever the counter drops.
    let mut bounds = vec![0];
    bounds.extend(
        samples
            .windows(2)
            .enumerate()
            .filter_map(|(i, w)| (w[1].evals < w[0].evals).then_some(i + 1)),
    );
    bounds.push(samples.len());

    Ok(bounds
        .windows(2)
        .filter_map(|b| RunRecord::new(samples[b[0]..b[1]].to_vec()))
        .collect())
}

/// Split a list of `(source_name, table)` pairs into one flat run list.
pub fn split_tables<'a, I>(tables: I, layout: ColumnLayout) -> Result<Vec<RunRecord>, SplitError>
where
    I: IntoIterator<Item = (&'a str, &'a [Vec<f64>])>,
{
    let mut runs = Vec::new();
    for (name, table) in tables {
        runs.extend(split_table(table, layout, name)?);
    }
    Ok(runs)
}
