//! gridcab CLI - runs the full two-axis hyperparameter sweep for the
//! tabular driving agent.

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    gridcab::cli::execute(gridcab::cli::RunArgs::parse())
}
