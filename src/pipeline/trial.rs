//! Trip loop for one agent lifetime
//!
//! A trial is one agent lifetime: a fresh agent, a fresh environment, and a
//! fixed number of trips. Each step follows the strict sequence
//! sense → decide → act → sense → learn → record; the accumulated records are
//! flushed to the history store in trip batches.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Environment, HistoryStore, SweepObserver},
    q_learning::{AgentRunConfig, LearningAgent},
    record::{StepLog, StepRecord},
    types::DriveState,
};

/// Identity and configuration of one agent lifetime.
///
/// Immutable once built: the experiment label, the global run identifier, and
/// the hyperparameters in effect are fixed for the whole trial instead of
/// living as mutable counters on the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunContext {
    /// Sweep axis label ("alpha" or "gamma")
    pub experiment: String,
    /// Global run identifier, monotone across the whole sweep
    pub run_id: usize,
    /// Hyperparameters for this lifetime
    pub config: AgentRunConfig,
}

/// Shape of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Trips per agent lifetime
    pub trips: usize,
    /// Flush the step log to the history store every this many trips
    pub flush_interval: usize,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            trips: 100,
            flush_interval: 100,
        }
    }
}

/// Outcome of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub trips: usize,
    /// Trips that ended with deadline remaining
    pub completed_trips: usize,
    pub steps: usize,
    /// Sum of all step rewards over the lifetime
    pub net_reward: f64,
    pub states_visited: usize,
    pub final_epsilon: f64,
    /// Flush attempts that failed and left their batch pending
    pub flush_failures: usize,
}

/// Drives one agent lifetime against an environment.
pub struct TrialRunner {
    ctx: RunContext,
    config: TrialConfig,
    env: Box<dyn Environment>,
    agent: LearningAgent,
    log: StepLog,
}

impl TrialRunner {
    /// Create a runner for one lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Hyperparameter`] if the context's
    /// configuration is out of range.
    pub fn new(ctx: RunContext, config: TrialConfig, env: Box<dyn Environment>) -> Result<Self> {
        let agent = LearningAgent::new(ctx.config)?;
        Ok(Self {
            ctx,
            config,
            env,
            agent,
            log: StepLog::new(),
        })
    }

    /// Seed the agent for a reproducible exploration sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.agent = self.agent.with_seed(seed);
        self
    }

    /// Run the full trip loop.
    ///
    /// `pending` is the caller-owned buffer of records whose flush failed
    /// earlier; batches that cannot be persisted are kept there and retried
    /// at the next flush boundary instead of being discarded. Persistence
    /// failures never abort the learning loop.
    ///
    /// # Errors
    ///
    /// Propagates environment faults (sensing, acting, trip setup) and
    /// observer failures. There is no retry; the trial aborts.
    pub fn run(
        mut self,
        pending: &mut Vec<StepRecord>,
        observers: &mut [Box<dyn SweepObserver>],
        history: &dyn HistoryStore,
    ) -> Result<TrialResult> {
        for observer in observers.iter_mut() {
            observer.on_trial_start(&self.ctx)?;
        }

        let mut total_steps = 0;
        let mut net_reward = 0.0;
        let mut completed_trips = 0;
        let mut flush_failures = 0;

        for trip in 1..=self.config.trips {
            self.env.begin_trip()?;
            let (steps, trip_reward) = self.run_trip(trip, observers)?;

            total_steps += steps;
            net_reward += trip_reward;
            if self.env.deadline() > 0 {
                completed_trips += 1;
            }

            for observer in observers.iter_mut() {
                observer.on_trip_end(&self.ctx, trip, steps, trip_reward)?;
            }

            if trip.is_multiple_of(self.config.flush_interval) && !self.flush(pending, history) {
                flush_failures += 1;
            }
        }

        // Trips not aligned with the flush interval leave a tail batch.
        if !self.flush(pending, history) {
            flush_failures += 1;
        }

        let result = TrialResult {
            trips: self.config.trips,
            completed_trips,
            steps: total_steps,
            net_reward,
            states_visited: self.agent.states_visited(),
            final_epsilon: self.agent.epsilon(),
            flush_failures,
        };

        for observer in observers.iter_mut() {
            observer.on_trial_end(&self.ctx, &result)?;
        }

        Ok(result)
    }

    fn run_trip(
        &mut self,
        trip: usize,
        observers: &mut [Box<dyn SweepObserver>],
    ) -> Result<(usize, f64)> {
        let mut step = 0;
        let mut net_reward = 0.0;
        while !self.env.trip_over() {
            step += 1;
            net_reward += self.run_step(trip, step, observers)?;
        }
        Ok((step, net_reward))
    }

    fn run_step(
        &mut self,
        trip: usize,
        step: usize,
        observers: &mut [Box<dyn SweepObserver>],
    ) -> Result<f64> {
        let waypoint = self.env.next_waypoint();
        let reading = self.env.sense()?;
        let deadline = self.env.deadline();
        let state = DriveState::observe(reading, waypoint);

        let (greedy_action, greedy_value) = self.agent.greedy(&state);
        let (action, explored) = self.agent.choose(&state);

        let reward = self.env.act(action)?;

        // Re-sense with the same waypoint: no re-planning mid-step.
        let after = self.env.sense()?;
        let next_state = DriveState::observe(after, waypoint);
        self.agent.learn(state, action, reward, &next_state);

        let record = StepRecord {
            experiment: self.ctx.experiment.clone(),
            run: self.ctx.run_id,
            trip,
            step,
            light: reading.light,
            opposing: state.opposing,
            oncoming: reading.oncoming,
            left: reading.left,
            right: reading.right,
            waypoint,
            action,
            greedy_action,
            greedy_value,
            reward,
            alpha: self.ctx.config.alpha,
            gamma: self.ctx.config.gamma,
            deadline,
            explored,
        };

        for observer in observers.iter_mut() {
            observer.on_step(&record)?;
        }
        self.log.push(record);

        Ok(reward)
    }

    /// Move the accumulated batch into `pending` and try to persist it.
    /// Returns whether the flush succeeded (an empty batch counts as success).
    fn flush(&mut self, pending: &mut Vec<StepRecord>, history: &dyn HistoryStore) -> bool {
        pending.extend(self.log.take());
        if pending.is_empty() {
            return true;
        }

        match history.merge_append(pending) {
            Ok(()) => {
                pending.clear();
                true
            }
            Err(err) => {
                eprintln!(
                    "Warning: history flush failed ({err}); keeping {} records for the next flush boundary.",
                    pending.len()
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        rc::Rc,
    };

    use super::*;
    use crate::{
        Error,
        types::{Action, SensorReading, TrafficLight},
    };

    /// Environment that replays a fixed number of identical steps per trip.
    struct ScriptedEnv {
        steps_per_trip: usize,
        step: usize,
        deadline: i32,
        fail_sensing: bool,
    }

    impl ScriptedEnv {
        fn new(steps_per_trip: usize) -> Self {
            Self {
                steps_per_trip,
                step: 0,
                deadline: 0,
                fail_sensing: false,
            }
        }
    }

    impl Environment for ScriptedEnv {
        fn begin_trip(&mut self) -> Result<()> {
            self.step = 0;
            self.deadline = self.steps_per_trip as i32 + 5;
            Ok(())
        }

        fn next_waypoint(&self) -> Action {
            Action::Forward
        }

        fn sense(&self) -> Result<SensorReading> {
            if self.fail_sensing {
                return Err(Error::SensorContract {
                    detail: "missing light reading".to_string(),
                });
            }
            Ok(SensorReading {
                light: TrafficLight::Green,
                oncoming: false,
                left: false,
                right: false,
            })
        }

        fn act(&mut self, _action: Action) -> Result<f64> {
            self.step += 1;
            self.deadline -= 1;
            Ok(1.0)
        }

        fn deadline(&self) -> i32 {
            self.deadline
        }

        fn trip_over(&self) -> bool {
            self.step >= self.steps_per_trip
        }
    }

    /// History store that can be toggled to fail, recording flushed batches.
    #[derive(Clone, Default)]
    struct MemoryStore {
        records: Rc<RefCell<Vec<StepRecord>>>,
        failing: Rc<RefCell<bool>>,
    }

    impl HistoryStore for MemoryStore {
        fn load(&self) -> Result<Vec<StepRecord>> {
            Ok(self.records.borrow().clone())
        }

        fn merge_append(&self, batch: &[StepRecord]) -> Result<()> {
            if *self.failing.borrow() {
                return Err(Error::Io {
                    operation: "write history".to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.records.borrow_mut().extend_from_slice(batch);
            Ok(())
        }
    }

    fn context() -> RunContext {
        RunContext {
            experiment: "alpha".to_string(),
            run_id: 0,
            config: AgentRunConfig::default(),
        }
    }

    #[test]
    fn runs_the_configured_number_of_trips() {
        let config = TrialConfig {
            trips: 4,
            flush_interval: 2,
        };
        let store = MemoryStore::default();
        let mut pending = Vec::new();

        let runner = TrialRunner::new(context(), config, Box::new(ScriptedEnv::new(3)))
            .unwrap()
            .with_seed(1);
        let result = runner.run(&mut pending, &mut [], &store).unwrap();

        assert_eq!(result.trips, 4);
        assert_eq!(result.steps, 12);
        assert_eq!(result.completed_trips, 4);
        assert!((result.net_reward - 12.0).abs() < 1e-12);
        assert_eq!(result.flush_failures, 0);
        assert!(pending.is_empty());
        assert_eq!(store.load().unwrap().len(), 12);
    }

    #[test]
    fn step_and_trip_counters_restart_per_trip() {
        let config = TrialConfig {
            trips: 2,
            flush_interval: 100,
        };
        let store = MemoryStore::default();
        let mut pending = Vec::new();

        let runner = TrialRunner::new(context(), config, Box::new(ScriptedEnv::new(2)))
            .unwrap()
            .with_seed(1);
        runner.run(&mut pending, &mut [], &store).unwrap();

        let records = store.load().unwrap();
        let trips: Vec<usize> = records.iter().map(|r| r.trip).collect();
        let steps: Vec<usize> = records.iter().map(|r| r.step).collect();
        assert_eq!(trips, vec![1, 1, 2, 2]);
        assert_eq!(steps, vec![1, 2, 1, 2]);
    }

    #[test]
    fn failed_flush_keeps_the_batch_pending() {
        let config = TrialConfig {
            trips: 2,
            flush_interval: 1,
        };
        let store = MemoryStore::default();
        *store.failing.borrow_mut() = true;
        let mut pending = Vec::new();

        let runner = TrialRunner::new(context(), config, Box::new(ScriptedEnv::new(2)))
            .unwrap()
            .with_seed(1);
        let result = runner.run(&mut pending, &mut [], &store).unwrap();

        // Two boundary flushes plus the tail flush all failed; nothing lost.
        assert_eq!(result.flush_failures, 3);
        assert_eq!(pending.len(), 4);
        assert!(store.load().unwrap().is_empty());

        // A later lifetime retries the pending batch at its first boundary.
        *store.failing.borrow_mut() = false;
        let runner = TrialRunner::new(
            context(),
            TrialConfig {
                trips: 1,
                flush_interval: 1,
            },
            Box::new(ScriptedEnv::new(2)),
        )
        .unwrap()
        .with_seed(2);
        let result = runner.run(&mut pending, &mut [], &store).unwrap();

        assert_eq!(result.flush_failures, 0);
        assert!(pending.is_empty());
        assert_eq!(store.load().unwrap().len(), 6);
    }

    #[test]
    fn sensor_contract_violation_aborts_the_trial() {
        let config = TrialConfig::default();
        let store = MemoryStore::default();
        let mut pending = Vec::new();

        let mut env = ScriptedEnv::new(2);
        env.fail_sensing = true;
        let runner = TrialRunner::new(context(), config, Box::new(env))
            .unwrap()
            .with_seed(1);
        let err = runner.run(&mut pending, &mut [], &store).unwrap_err();
        assert!(matches!(err, Error::SensorContract { .. }));
    }
}
