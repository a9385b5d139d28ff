//! Two-axis hyperparameter sweep
//!
//! For each axis (alpha, gamma) the driver runs 10 tested values × 10
//! repetitions, each repetition being an independent agent lifetime in a
//! fresh environment. Lifetimes execute strictly sequentially and share
//! nothing but the history store; any fault aborts the axis, there is no
//! per-trial isolation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::{
    Result,
    pipeline::trial::{RunContext, TrialConfig, TrialRunner},
    ports::{Environment, HistoryStore, SweepObserver},
    q_learning::AgentRunConfig,
    record::StepRecord,
};

/// Hyperparameter axis varied across one batch of lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepAxis {
    Alpha,
    Gamma,
}

impl SweepAxis {
    /// Label used for experiment tagging in step records.
    pub fn label(self) -> &'static str {
        match self {
            SweepAxis::Alpha => "alpha",
            SweepAxis::Gamma => "gamma",
        }
    }

    /// Override this axis on an otherwise default configuration.
    pub fn apply(self, config: AgentRunConfig, value: f64) -> AgentRunConfig {
        match self {
            SweepAxis::Alpha => config.with_alpha(value),
            SweepAxis::Gamma => config.with_gamma(value),
        }
    }
}

/// Linear map from a tested index to a hyperparameter value.
///
/// Both axes span the same range: index 1..=10 gives 0.25..=0.70.
pub fn axis_value(index: usize) -> f64 {
    index as f64 / 20.0 + 0.2
}

/// Shape of the full sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Distinct hyperparameter values tested per axis
    pub values_per_axis: usize,
    /// Independent lifetimes per tested value
    pub repetitions: usize,
    /// Shape of each lifetime
    pub trial: TrialConfig,
    /// Base seed; each lifetime derives its own as base + run id
    pub seed: Option<u64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            values_per_axis: 10,
            repetitions: 10,
            trial: TrialConfig::default(),
            seed: None,
        }
    }
}

/// Aggregate over the repetitions of one tested value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueStats {
    pub value: f64,
    pub trials: usize,
    pub mean_net_reward: f64,
    pub std_net_reward: f64,
    pub mean_steps: f64,
    pub completed_trips: usize,
}

/// All tested values of one axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisReport {
    pub axis: SweepAxis,
    pub per_value: Vec<ValueStats>,
}

/// Result of a full two-axis sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResult {
    /// Total agent lifetimes executed
    pub total_trials: usize,
    pub axes: Vec<AxisReport>,
}

impl SweepResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Sweep driver: runs every lifetime of both axes against environments
/// produced by a factory.
pub struct SweepDriver {
    config: SweepConfig,
    observers: Vec<Box<dyn SweepObserver>>,
    pending: Vec<StepRecord>,
}

impl SweepDriver {
    /// Create a new sweep driver
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Add an observer to the sweep
    pub fn with_observer(mut self, observer: Box<dyn SweepObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run both axes to completion.
    ///
    /// `envs` produces one fresh environment per lifetime. All persistence
    /// goes through `history`, the process's single writer.
    ///
    /// # Errors
    ///
    /// Any environment or observer fault aborts the sweep; lifetimes are not
    /// retried or isolated from each other.
    pub fn run(
        &mut self,
        envs: &mut dyn FnMut() -> Box<dyn Environment>,
        history: &dyn HistoryStore,
    ) -> Result<SweepResult> {
        let total = 2 * self.config.values_per_axis * self.config.repetitions;
        for observer in &mut self.observers {
            observer.on_sweep_start(total)?;
        }

        let mut next_run_id = 0;
        let mut axes = Vec::with_capacity(2);
        for axis in [SweepAxis::Alpha, SweepAxis::Gamma] {
            axes.push(self.run_axis(axis, &mut next_run_id, envs, history)?);
        }

        for observer in &mut self.observers {
            observer.on_sweep_end()?;
        }

        Ok(SweepResult {
            total_trials: next_run_id,
            axes,
        })
    }

    fn run_axis(
        &mut self,
        axis: SweepAxis,
        next_run_id: &mut usize,
        envs: &mut dyn FnMut() -> Box<dyn Environment>,
        history: &dyn HistoryStore,
    ) -> Result<AxisReport> {
        let mut per_value = Vec::with_capacity(self.config.values_per_axis);

        for index in 1..=self.config.values_per_axis {
            let value = axis_value(index);
            let mut rewards = Vec::with_capacity(self.config.repetitions);
            let mut steps = Vec::with_capacity(self.config.repetitions);
            let mut completed_trips = 0;

            for _ in 0..self.config.repetitions {
                let ctx = RunContext {
                    experiment: axis.label().to_string(),
                    run_id: *next_run_id,
                    config: axis.apply(AgentRunConfig::default(), value),
                };
                *next_run_id += 1;

                let mut runner =
                    TrialRunner::new(ctx.clone(), self.config.trial.clone(), envs())?;
                if let Some(seed) = self.config.seed {
                    runner = runner.with_seed(seed.wrapping_add(ctx.run_id as u64));
                }

                let result = runner.run(&mut self.pending, &mut self.observers, history)?;
                rewards.push(result.net_reward);
                steps.push(result.steps as f64);
                completed_trips += result.completed_trips;
            }

            per_value.push(ValueStats {
                value,
                trials: self.config.repetitions,
                mean_net_reward: rewards.iter().mean(),
                std_net_reward: spread(&rewards),
                mean_steps: steps.iter().mean(),
                completed_trips,
            });
        }

        Ok(AxisReport { axis, per_value })
    }
}

/// Sample standard deviation, 0.0 for fewer than two observations.
fn spread(values: &[f64]) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        values.iter().std_dev()
    }
}
