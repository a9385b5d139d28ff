//! Observer port - abstraction for sweep observation and data collection
//!
//! Observers compose: progress bars, metrics, custom collectors. All hooks
//! default to no-ops so implementations override only what they need.
//!
//! # Event sequence
//!
//! 1. `on_sweep_start(total_trials)` - once
//! 2. For each trial (agent lifetime):
//!    - `on_trial_start(ctx)`
//!    - `on_step(record)` - for every decision step
//!    - `on_trip_end(ctx, trip, steps, net_reward)` - per trip
//!    - `on_trial_end(ctx, result)`
//! 3. `on_sweep_end()` - once

use crate::{
    Result,
    pipeline::trial::{RunContext, TrialResult},
    record::StepRecord,
};

/// Observer trait for monitoring hyperparameter sweeps
pub trait SweepObserver: Send {
    /// Called once before the first trial.
    fn on_sweep_start(&mut self, _total_trials: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an agent lifetime begins.
    fn on_trial_start(&mut self, _ctx: &RunContext) -> Result<()> {
        Ok(())
    }

    /// Called after each decision step, with the record created for it.
    fn on_step(&mut self, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called when a trip ends.
    fn on_trip_end(
        &mut self,
        _ctx: &RunContext,
        _trip: usize,
        _steps: usize,
        _net_reward: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an agent lifetime completes.
    fn on_trial_end(&mut self, _ctx: &RunContext, _result: &TrialResult) -> Result<()> {
        Ok(())
    }

    /// Called once after the last trial.
    fn on_sweep_end(&mut self) -> Result<()> {
        Ok(())
    }
}
