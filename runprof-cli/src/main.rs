//! runprof CLI — post-process raw optimizer benchmark data.
//!
//! Commands:
//! - `process` — parse, split, align, and aggregate data files against a
//!   target value; print the sparse table and optionally write full JSON
//! - `inspect` — parse and split only; report runs per file and their
//!   observed evaluation ceilings

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use runprof_core::{
    parse_table, process_entry, sparse_columns, split_table, ColumnLayout, IndexEntry,
    PostprocessConfig, ResampleConfig, DEFAULT_MAX_EVALS_FACTOR,
};

#[derive(Parser)]
#[command(
    name = "runprof",
    about = "runprof — runtime statistics from stochastic optimizer benchmark traces"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post-process data files into runtime statistics.
    Process {
        /// Raw data files (runs concatenated per file are split automatically).
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Target function value to reach.
        #[arg(long)]
        target: f64,

        /// Problem dimension; the evaluation cap is max-evals-factor × dim.
        #[arg(long, default_value_t = 1)]
        dim: u32,

        /// Scale factor for the evaluation-budget cap.
        #[arg(long, default_value_t = DEFAULT_MAX_EVALS_FACTOR)]
        max_evals_factor: f64,

        /// Column index of the evaluation counter.
        #[arg(long, default_value_t = 0)]
        evals_col: usize,

        /// Column index of the function value.
        #[arg(long, default_value_t = 2)]
        value_col: usize,

        /// Seed for the bootstrap dispersion bounds.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Write the full output (dense table, sparse table, data profile)
        /// as JSON to this path.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Parse and split data files without post-processing.
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Column index of the evaluation counter.
        #[arg(long, default_value_t = 0)]
        evals_col: usize,

        /// Column index of the function value.
        #[arg(long, default_value_t = 2)]
        value_col: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Process {
            files,
            target,
            dim,
            max_evals_factor,
            evals_col,
            value_col,
            seed,
            json,
        } => process(
            files,
            target,
            dim,
            max_evals_factor,
            ColumnLayout {
                func_evals: evals_col,
                fit_value: value_col,
            },
            seed,
            json,
        ),
        Commands::Inspect {
            files,
            evals_col,
            value_col,
        } => inspect(
            files,
            ColumnLayout {
                func_evals: evals_col,
                fit_value: value_col,
            },
        ),
    }
}

fn process(
    files: Vec<PathBuf>,
    target: f64,
    dim: u32,
    max_evals_factor: f64,
    layout: ColumnLayout,
    seed: u64,
    json: Option<PathBuf>,
) -> Result<()> {
    let cfg = PostprocessConfig {
        resample: ResampleConfig {
            seed,
            ..ResampleConfig::default()
        },
        ..PostprocessConfig::default()
    };
    let mut entry = IndexEntry {
        func_id: 0,
        dim,
        data_files: files,
        target_func_value: Some(target),
        results: None,
    };
    process_entry(&mut entry, layout, max_evals_factor, &cfg).context("post-processing failed")?;

    let out = entry
        .results
        .as_ref()
        .context("driver returned no results")?;

    println!(
        "{} runs, effective max evals {:.0}",
        out.run_count, out.effective_max_evals
    );
    println!();
    print_sparse_table(&out.sparse_table);

    if let Some(path) = json {
        let rendered =
            serde_json::to_string_pretty(out).context("failed to serialize results to JSON")?;
        std::fs::write(&path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!();
        println!("full output written to {}", path.display());
    }
    Ok(())
}

fn print_sparse_table(rows: &[Vec<f64>]) {
    let cols = sparse_columns();
    let header: Vec<String> = cols.iter().map(|c| format!("{:>10}", c.label)).collect();
    println!("{}", header.join(" "));
    for row in rows {
        let cells: Vec<String> = cols
            .iter()
            .zip(row)
            .map(|(col, &v)| format!("{:>10}", col.render(v)))
            .collect();
        println!("{}", cells.join(" "));
    }
}

fn inspect(files: Vec<PathBuf>, layout: ColumnLayout) -> Result<()> {
    for path in &files {
        let table = parse_table(path)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let runs = split_table(&table, layout, &path.display().to_string())
            .with_context(|| format!("failed to split {}", path.display()))?;
        println!("{}: {} rows, {} runs", path.display(), table.len(), runs.len());
        for (i, run) in runs.iter().enumerate() {
            println!(
                "  run {}: {} samples, observed max evals {:.0}, final value {:.3e}",
                i,
                run.len(),
                run.observed_max_evals(),
                run.samples()[run.len() - 1].value
            );
        }
    }
    Ok(())
}
