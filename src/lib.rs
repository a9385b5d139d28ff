//! Tabular Q-learning driving agent for a grid-world traffic simulation
//!
//! This crate provides:
//! - A lossy discrete state abstraction over raw traffic observations
//! - An action-value table with lazy row expansion and TD(0) updates
//! - An ε-greedy policy with per-decision linear exploration decay
//! - Trial and two-axis hyperparameter sweep drivers with composable
//!   observers
//! - CSV-backed step-history persistence and a reference environment

pub mod adapters;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod record;
pub mod types;

pub use error::{Error, Result};
pub use q_learning::{AgentRunConfig, LearningAgent, QTable};
pub use types::{ACTIONS, Action, DriveState, SensorReading, TrafficLight};
