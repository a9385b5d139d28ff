//! Learning agent: ε-greedy policy over a Q-table with TD(0) updates
//!
//! One agent instance owns its Q-table, its hyperparameters, and its
//! exploration-rate state for exactly one training lifetime.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    q_learning::q_table::QTable,
    types::{ACTIONS, Action, DriveState},
};

/// Amount subtracted from the exploration rate after every decision.
pub const EPSILON_DECAY_STEP: f64 = 0.01;

/// Hyperparameters for one agent lifetime.
///
/// `alpha` and `gamma` must lie in (0, 1], `epsilon` in [0, 1]. The sweep
/// driver overrides a single axis per lifetime via the `with_*` builders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentRunConfig {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Initial exploration rate ε
    pub epsilon: f64,
}

impl Default for AgentRunConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            gamma: 0.3,
            epsilon: 0.99,
        }
    }
}

impl AgentRunConfig {
    /// Override the learning rate.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Override the discount factor.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Override the initial exploration rate.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check all hyperparameters against their legal ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hyperparameter`] naming the offending parameter.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::Hyperparameter {
                name: "alpha",
                value: self.alpha,
            });
        }
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(Error::Hyperparameter {
                name: "gamma",
                value: self.gamma,
            });
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::Hyperparameter {
                name: "epsilon",
                value: self.epsilon,
            });
        }
        Ok(())
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning agent (off-policy TD control)
///
/// Decisions are ε-greedy with a linearly decaying exploration rate; a greedy
/// estimate of exactly 0.0 is treated as "no information yet" and forces
/// exploration. Learning updates always move toward the maximum next-state
/// value regardless of the action actually taken next.
#[derive(Debug, Clone)]
pub struct LearningAgent {
    q_table: QTable,
    config: AgentRunConfig,
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl LearningAgent {
    /// Create a new agent for one lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hyperparameter`] if the configuration is out of range.
    pub fn new(config: AgentRunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table: QTable::new(),
            epsilon: config.epsilon,
            config,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    /// Seed the agent's RNG for a reproducible exploration sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// ε-greedy action selection.
    ///
    /// Returns the chosen action and whether it was exploratory. Every call
    /// decays the exploration rate by [`EPSILON_DECAY_STEP`], clamped at 0.
    pub fn choose(&mut self, state: &DriveState) -> (Action, bool) {
        let (greedy_action, greedy_value) = self.q_table.best_action(state);

        let explore = self.rng.random::<f64>() < self.epsilon || greedy_value == 0.0;
        let action = if explore {
            // Uniform over the four legal actions
            *ACTIONS.choose(&mut self.rng).unwrap()
        } else {
            greedy_action
        };

        if self.epsilon > 0.0 {
            self.epsilon = (self.epsilon - EPSILON_DECAY_STEP).max(0.0);
        }

        (action, explore)
    }

    /// Apply one TD(0) update for an executed action and its observed
    /// consequence.
    pub fn learn(&mut self, prev: DriveState, action: Action, reward: f64, next: &DriveState) {
        self.q_table
            .td_update(prev, action, reward, next, self.config.alpha, self.config.gamma);
    }

    /// Greedy action and value at the current table state, without deciding.
    pub fn greedy(&self, state: &DriveState) -> (Action, f64) {
        self.q_table.best_action(state)
    }

    /// Current value estimate for a state-action pair.
    pub fn value_of(&self, state: &DriveState, action: Action) -> f64 {
        self.q_table.value_of(state, action)
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Hyperparameters in effect for this lifetime.
    pub fn config(&self) -> &AgentRunConfig {
        &self.config
    }

    /// Number of distinct states visited so far.
    pub fn states_visited(&self) -> usize {
        self.q_table.len()
    }
}
