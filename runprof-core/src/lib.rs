//! runprof core — alignment and aggregation of stochastic optimizer
//! benchmark traces.
//!
//! Many independent runs of an optimization algorithm each leave a monotone
//! trace of (evaluation count, best function value so far). This crate
//! turns those traces into comparable performance statistics:
//! - Raw table parsing (whitespace-separated, `%` comments)
//! - Run splitting at evaluation-counter restarts
//! - Lockstep alignment of all runs down a decaying threshold ladder
//! - Per-threshold aggregation: SP1 expected cost, bootstrap dispersion
//!   bounds, success counts, order statistics
//! - Orchestration into a dense table, a sparse table at canonical target
//!   levels, and data-profile snapshots
//!
//! Everything is synchronous and call-scoped: one `postprocess` call owns
//! its runs, and identical inputs (with identical resampling seeds) yield
//! identical outputs.

pub mod aggregate;
pub mod align;
pub mod driver;
pub mod parse;
pub mod postprocess;
pub mod run;
pub mod split;
pub mod stats;

pub use aggregate::{compute_values, sparse_columns, AggregateError, ColumnSpec, NumberFormat};
pub use align::{align_runs, AlignedScan, LadderConfig, LadderStep, ThresholdScan};
pub use driver::{process_entry, DriverError, IndexEntry, DEFAULT_MAX_EVALS_FACTOR};
pub use parse::{parse_table, parse_table_str, ParseError};
pub use postprocess::{postprocess, PostprocessConfig, PostprocessError, PostprocessOutput};
pub use run::{ColumnLayout, RunRecord, Sample};
pub use split::{split_table, split_tables, SplitError};
pub use stats::{percentile, percentile_sorted, resample_bounds, sp1, ResampleConfig, Sp1Estimate};
