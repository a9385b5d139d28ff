//! Tabular Q-learning: action-value table, ε-greedy policy, TD(0) updates
//!
//! The agent bootstraps value estimates from successor states: after each
//! executed action the environment is re-sensed and the stored estimate is
//! blended toward `reward + γ · max_a' Q(s', a')`. Exploration follows an
//! ε-greedy policy whose rate decays linearly per decision, with unseen
//! states (greedy estimate exactly 0.0) always explored.

pub mod agent;
pub mod q_table;

// Public re-exports
pub use agent::{AgentRunConfig, EPSILON_DECAY_STEP, LearningAgent};
pub use q_table::{ActionRow, QTable};
