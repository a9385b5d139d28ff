//! Observer implementations for sweep progress and metrics
//!
//! Observers allow composable data collection during a sweep without
//! coupling the drivers to specific output formats.

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    pipeline::trial::{RunContext, TrialResult},
    ports::SweepObserver,
    record::StepRecord,
};

/// Progress bar observer - shows sweep progress per lifetime
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    trials_done: usize,
    net_reward: f64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            trials_done: 0,
            net_reward: 0.0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepObserver for ProgressObserver {
    fn on_sweep_start(&mut self, total_trials: usize) -> Result<()> {
        let pb = ProgressBar::new(total_trials as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_end(&mut self, ctx: &RunContext, result: &TrialResult) -> Result<()> {
        self.trials_done += 1;
        self.net_reward += result.net_reward;

        if let Some(pb) = &self.progress_bar {
            pb.set_position(self.trials_done as u64);
            pb.set_message(format!(
                "{} #{}, mean reward {:.1}",
                ctx.experiment,
                ctx.run_id,
                self.net_reward / self.trials_done as f64
            ));
        }
        Ok(())
    }

    fn on_sweep_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!(
                "mean reward {:.1}",
                self.net_reward / self.trials_done.max(1) as f64
            ));
        }
        Ok(())
    }
}

/// Metrics observer - aggregates sweep-wide counters
pub struct MetricsObserver {
    trials: usize,
    trips: usize,
    steps: usize,
    explored_steps: usize,
    net_reward: f64,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            trials: 0,
            trips: 0,
            steps: 0,
            explored_steps: 0,
            net_reward: 0.0,
        }
    }

    /// Share of steps decided by exploration rather than greedily
    pub fn exploration_share(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.explored_steps as f64 / self.steps as f64
        }
    }

    /// Average steps per trip
    pub fn avg_steps_per_trip(&self) -> f64 {
        if self.trips == 0 {
            0.0
        } else {
            self.steps as f64 / self.trips as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            trials: self.trials,
            trips: self.trips,
            steps: self.steps,
            net_reward: self.net_reward,
            exploration_share: self.exploration_share(),
            avg_steps_per_trip: self.avg_steps_per_trip(),
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of sweep metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub trials: usize,
    pub trips: usize,
    pub steps: usize,
    pub net_reward: f64,
    pub exploration_share: f64,
    pub avg_steps_per_trip: f64,
}

impl SweepObserver for MetricsObserver {
    fn on_step(&mut self, record: &StepRecord) -> Result<()> {
        self.steps += 1;
        self.net_reward += record.reward;
        if record.explored {
            self.explored_steps += 1;
        }
        Ok(())
    }

    fn on_trip_end(
        &mut self,
        _ctx: &RunContext,
        _trip: usize,
        _steps: usize,
        _net_reward: f64,
    ) -> Result<()> {
        self.trips += 1;
        Ok(())
    }

    fn on_trial_end(&mut self, _ctx: &RunContext, _result: &TrialResult) -> Result<()> {
        self.trials += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        q_learning::AgentRunConfig,
        types::{Action, TrafficLight},
    };

    fn record(reward: f64, explored: bool) -> StepRecord {
        StepRecord {
            experiment: "alpha".to_string(),
            run: 0,
            trip: 1,
            step: 1,
            light: TrafficLight::Green,
            opposing: false,
            oncoming: false,
            left: false,
            right: false,
            waypoint: Action::Forward,
            action: Action::Forward,
            greedy_action: Action::Idle,
            greedy_value: 0.0,
            reward,
            alpha: 0.3,
            gamma: 0.3,
            deadline: 10,
            explored,
        }
    }

    #[test]
    fn metrics_observer_aggregates_steps_and_trips() {
        let ctx = RunContext {
            experiment: "alpha".to_string(),
            run_id: 0,
            config: AgentRunConfig::default(),
        };
        let mut observer = MetricsObserver::new();

        observer.on_step(&record(2.0, true)).unwrap();
        observer.on_step(&record(-0.5, false)).unwrap();
        observer.on_trip_end(&ctx, 1, 2, 1.5).unwrap();

        let summary = observer.summary();
        assert_eq!(summary.steps, 2);
        assert_eq!(summary.trips, 1);
        assert!((summary.net_reward - 1.5).abs() < 1e-12);
        assert!((summary.exploration_share - 0.5).abs() < 1e-12);
        assert!((summary.avg_steps_per_trip - 2.0).abs() < 1e-12);
    }
}
