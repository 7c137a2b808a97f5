//! End-to-end pipeline tests: raw table text → parse → split → postprocess.

use runprof_core::{
    align_runs, parse_table_str, postprocess, split_table, ColumnLayout, LadderConfig,
    PostprocessConfig, RunRecord,
};

const CANONICAL: [f64; 5] = [1.0, 1e-2, 1e-4, 1e-6, 1e-8];

fn layout01() -> ColumnLayout {
    ColumnLayout {
        func_evals: 0,
        fit_value: 1,
    }
}

fn runs_from(text: &str) -> Vec<RunRecord> {
    let table = parse_table_str(text, "pipeline.dat").unwrap();
    split_table(&table, layout01(), "pipeline.dat").unwrap()
}

#[test]
fn restart_in_one_file_yields_two_runs() {
    // The counter dropping from 90 to 5 marks a restart.
    let runs = runs_from(
        "% fevals fvalue\n\
         10 4.0\n90 0.5\n\
         5 6.0\n80 0.2\n",
    );
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].observed_max_evals(), 90.0);
    assert_eq!(runs[1].observed_max_evals(), 80.0);
}

#[test]
fn single_run_data_profile_follows_the_trace() {
    // One run reaching 1e-9 at its last sample, target 1e-8: the profile
    // snapshot at 1e-4 is the final evaluation count.
    let mut runs = runs_from("10 5.0\n20 1.0\n30 1e-9\n");
    let scan = align_runs(&mut runs, 1e-8, &CANONICAL, &CANONICAL, &LadderConfig::default());
    assert_eq!(scan.profile_hits[2], Some(vec![30.0])); // value 1e-4
    assert_eq!(scan.profile_hits[0], Some(vec![20.0])); // value 1.0
}

#[test]
fn three_successful_runs_full_pipeline() {
    let runs = runs_from(
        "50 2.0\n100 1e-9\n\
         60 3.0\n150 1e-9\n\
         70 2.5\n200 1e-9\n",
    );
    assert_eq!(runs.len(), 3);
    let out = postprocess(runs, 1e-8, 1e5, &PostprocessConfig::default()).unwrap();

    assert_eq!(out.run_count, 3);
    assert_eq!(out.effective_max_evals, 200.0);

    // Dense rows aggregate against observed max + 1, so every run counts
    // successful: the final row is plain mean 150 with success rate 1 and
    // order statistics over [100, 150, 200] (rank-3 collapses onto the
    // extremes with three runs).
    let last = out.full_table.last().unwrap();
    assert_eq!(&last[1..], &[150.0, 1.0, 100.0, 200.0, 150.0, 100.0, 200.0]);

    // Sparse rows aggregate against the effective cap of 200: the longest
    // run sits exactly on the cap and does not count successful.
    let row = out
        .sparse_table
        .iter()
        .find(|r| r[0] == 1e-4)
        .expect("1e-4 row present");
    assert_eq!(row[4], 2.0); // successes
    assert_eq!(row[1], 187.5); // mean(100, 150) / (2/3)
    assert!(row[2] <= row[3]); // dispersion bounds ordered
    assert_eq!(&row[5..], &[100.0, 200.0, 150.0, 100.0, 200.0]);

    assert_eq!(out.profile_at(1e-2), Some([100.0, 150.0, 200.0].as_slice()));
}

#[test]
fn unreachable_targets_get_sentinel_rows() {
    // All three runs bottom out near 0.4: everything below 1.0 is sentinel.
    let runs = runs_from(
        "10 8.0\n60 0.5\n\
         12 7.0\n70 0.4\n\
         15 6.0\n80 0.6\n",
    );
    let out = postprocess(runs, 1e-8, 1e5, &PostprocessConfig::default()).unwrap();
    let cap = out.effective_max_evals;
    assert_eq!(cap, 80.0);
    for row in out.sparse_table.iter().filter(|r| r[0] < 1.0) {
        assert!(row[1].is_infinite(), "sentinel estimate at {}", row[0]);
        assert_eq!(row[4], 0.0, "sentinel success count at {}", row[0]);
        assert_eq!(&row[5..], &[cap, cap, cap, cap, cap]);
    }
}

#[test]
fn sparse_thresholds_equal_the_canonical_sequence() {
    let runs = runs_from(
        "50 2.0\n100 1e-9\n\
         60 3.0\n150 1e-9\n\
         70 2.5\n200 1e-9\n",
    );
    let cfg = PostprocessConfig::default();
    let out = postprocess(runs, 1e-8, 1e5, &cfg).unwrap();
    let thresholds: Vec<f64> = out.sparse_table.iter().map(|r| r[0]).collect();
    assert_eq!(thresholds, cfg.values_of_interest);
}

#[test]
fn full_table_strictly_decreasing_and_fixed_width() {
    let runs = runs_from(
        "50 2.0\n100 1e-9\n\
         60 3.0\n150 1e-9\n\
         70 2.5\n200 1e-9\n",
    );
    let out = postprocess(runs, 1e-8, 1e5, &PostprocessConfig::default()).unwrap();
    assert!(out.full_table.windows(2).all(|w| w[1][0] < w[0][0]));
    assert!(out.full_table.iter().all(|r| r.len() == 8));
    assert!(out.sparse_table.iter().all(|r| r.len() == 10));
}

#[test]
fn identical_inputs_yield_identical_outputs() {
    let text = "50 2.0\n100 1e-9\n60 3.0\n150 1e-9\n70 2.5\n200 1e-9\n";
    let cfg = PostprocessConfig::default();
    let a = postprocess(runs_from(text), 1e-8, 1e5, &cfg).unwrap();
    let b = postprocess(runs_from(text), 1e-8, 1e5, &cfg).unwrap();
    assert_eq!(a, b);
}

#[test]
fn output_round_trips_through_json() {
    // Every run crosses all canonical values strictly under the cap, so no
    // bootstrap draw can fail and no infinity reaches the JSON (serde_json
    // cannot represent non-finite floats).
    let runs = runs_from(
        "50 2.0\n100 1e-9\n\
         60 3.0\n150 1e-9\n\
         70 2.5\n150 1e-9\n200 1e-11\n",
    );
    let out = postprocess(runs, 1e-8, 1e5, &PostprocessConfig::default()).unwrap();
    assert!(out
        .sparse_table
        .iter()
        .all(|row| row.iter().all(|v| v.is_finite())));
    let json = serde_json::to_string(&out).unwrap();
    let back: runprof_core::PostprocessOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(out, back);
}
