//! Command-line surface: a single entry point that runs the full two-axis
//! hyperparameter sweep.
//!
//! The sweep shape itself is fixed; the flags only control instrumentation
//! (history location, summary output, seeding, progress display).

pub mod output;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use crate::{
    adapters::{CsvHistoryStore, GridWorld},
    pipeline::{MetricsObserver, ProgressObserver, SweepConfig, SweepDriver, SweepResult},
    ports::Environment,
};

#[derive(Parser, Debug)]
#[command(
    name = "gridcab",
    version,
    about = "Run the two-axis hyperparameter sweep for the driving agent"
)]
pub struct RunArgs {
    /// Where step history accumulates across runs
    #[arg(long, default_value = "run_history.csv")]
    pub history: PathBuf,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Random seed for reproducible exploration and traffic
    #[arg(long)]
    pub seed: Option<u64>,

    /// Suppress the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("sweep_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Run the full sweep with the default shape.
///
/// # Errors
///
/// Returns an error on environment faults or when the summary cannot be
/// written.
pub fn execute(args: RunArgs) -> Result<()> {
    run_sweep(args, SweepConfig::default())
}

/// Run a sweep with an explicit shape.
///
/// Split out from [`execute`] so tests can scale the sweep down without
/// widening the CLI surface.
pub fn run_sweep(args: RunArgs, mut config: SweepConfig) -> Result<()> {
    config.seed = args.seed;

    let mut driver = SweepDriver::new(config).with_observer(Box::new(MetricsObserver::new()));
    if !args.no_progress {
        driver = driver.with_observer(Box::new(ProgressObserver::new()));
    }

    let store = CsvHistoryStore::new(&args.history);

    // Distinct seed per created environment so lifetimes stay independent.
    let base_seed = args.seed;
    let mut env_count: u64 = 0;
    let mut factory = move || -> Box<dyn Environment> {
        env_count += 1;
        Box::new(GridWorld::new(base_seed.map(|s| s.wrapping_add(env_count))))
    };

    let result = driver.run(&mut factory, &store)?;
    report(&result, store.path());

    if let Some(raw) = args.summary {
        let path = sanitize_summary_path(&raw);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        result.save(&path)?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}

fn report(result: &SweepResult, history_path: &Path) {
    output::print_section("Sweep complete");
    output::print_kv("trials", &result.total_trials.to_string());
    output::print_kv("history", &history_path.display().to_string());

    for axis in &result.axes {
        output::print_subsection(&format!("axis: {}", axis.axis.label()));
        for stats in &axis.per_value {
            println!(
                "  {:>5.2}  reward {:>8.1} ± {:>6.1}  steps {:>7.1}  completed {:>4}",
                stats.value,
                stats.mean_net_reward,
                stats.std_net_reward,
                stats.mean_steps,
                stats.completed_trips
            );
        }
    }
}
