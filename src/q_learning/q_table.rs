//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ACTIONS, Action, DriveState};

/// Value estimates for all four actions in one state.
///
/// Rows are created whole, so every visited state always carries all four
/// actions initialized to 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRow {
    values: [f64; 4],
}

impl ActionRow {
    /// Get the estimate for one action.
    pub fn get(&self, action: Action) -> f64 {
        self.values[action.index()]
    }

    /// Set the estimate for one action.
    pub fn set(&mut self, action: Action, value: f64) {
        self.values[action.index()] = value;
    }
}

/// Q-table mapping discrete driving states to per-action value estimates
///
/// Rows expand lazily on first visit and are never removed for the lifetime
/// of one agent instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QTable {
    rows: HashMap<DriveState, ActionRow>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value estimate for a state-action pair, 0.0 for unseen pairs
    pub fn value_of(&self, state: &DriveState, action: Action) -> f64 {
        self.rows.get(state).map_or(0.0, |row| row.get(action))
    }

    /// Greedy action and value for a state.
    ///
    /// Starts from the `(Idle, 0.0)` baseline and takes the first strictly
    /// greater value in [`ACTIONS`] order, so unseen states and rows with no
    /// positive value yield `(Idle, 0.0)` and ties break deterministically
    /// toward the earlier action.
    pub fn best_action(&self, state: &DriveState) -> (Action, f64) {
        let mut best = (Action::Idle, 0.0);
        if let Some(row) = self.rows.get(state) {
            for action in ACTIONS {
                let value = row.get(action);
                if value > best.1 {
                    best = (action, value);
                }
            }
        }
        best
    }

    /// Set the estimate for a state-action pair, lazily creating the state's
    /// four-action row if absent
    pub fn set(&mut self, state: DriveState, action: Action, value: f64) {
        self.row_mut(state).set(action, value);
    }

    /// TD(0) update: off-policy control toward the best next-state value
    ///
    /// Q(s,a) ← Q(s,a)·(1−α) + α·[r + γ·max_a' Q(s',a')]
    pub fn td_update(
        &mut self,
        state: DriveState,
        action: Action,
        reward: f64,
        next_state: &DriveState,
        alpha: f64,
        gamma: f64,
    ) {
        let old = self.value_of(&state, action);
        let (_, next_best) = self.best_action(next_state);
        let new = old * (1.0 - alpha) + alpha * (reward + gamma * next_best);
        self.set(state, action, new);
    }

    /// Number of states visited so far
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no state has been visited yet
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row_mut(&mut self, state: DriveState) -> &mut ActionRow {
        self.rows.entry(state).or_default()
    }
}
