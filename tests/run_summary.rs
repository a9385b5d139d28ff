//! CLI-level tests: argument parsing, summary file placement, and history
//! accumulation through `run_sweep`.

use clap::Parser;
use gridcab::{
    cli::{RunArgs, run_sweep},
    pipeline::{SweepConfig, TrialConfig},
};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> RunArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    RunArgs::parse_from(args)
}

fn tiny_config() -> SweepConfig {
    SweepConfig {
        values_per_axis: 1,
        repetitions: 1,
        trial: TrialConfig {
            trips: 2,
            flush_interval: 2,
        },
        seed: None,
    }
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("sweep_overview");
    let history = tmp.path().join("history.csv");

    let args = parse_args([
        "gridcab",
        "--history",
        history.to_str().unwrap(),
        "--summary",
        summary_stem.to_str().unwrap(),
        "--seed",
        "11",
        "--no-progress",
    ]);

    run_sweep(args, tiny_config()).expect("sweep with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["total_trials"], 2);
    assert_eq!(parsed["axes"][0]["axis"], "alpha");
    assert_eq!(parsed["axes"][1]["axis"], "gamma");
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());
    let history = tmp.path().join("history.csv");

    let args = parse_args([
        "gridcab",
        "--history",
        history.to_str().unwrap(),
        "--summary",
        &summary_arg,
        "--seed",
        "12",
        "--no-progress",
    ]);

    run_sweep(args, tiny_config()).expect("sweep with directory summary should succeed");

    let expected_path = summary_dir.join("sweep_summary.json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["axes"][0]["per_value"][0]["value"], 0.25);
}

#[test]
fn history_accumulates_across_invocations() {
    let tmp = tempdir().unwrap();
    let history = tmp.path().join("history.csv");

    for seed in ["1", "2"] {
        let args = parse_args([
            "gridcab",
            "--history",
            history.to_str().unwrap(),
            "--seed",
            seed,
            "--no-progress",
        ]);
        run_sweep(args, tiny_config()).expect("sweep should succeed");
    }

    let contents = std::fs::read_to_string(&history).unwrap();
    let mut lines = contents.lines();
    let header = lines.next().expect("history should have a header row");
    assert!(header.starts_with("experiment,run,trip,step,light"));
    assert!(lines.count() > 0);
}
