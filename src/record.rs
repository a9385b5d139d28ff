//! Step history records
//!
//! One record per decision step, accumulated in memory and flushed to the
//! history store in trip batches. The records are instrumentation for offline
//! analysis; learning never reads them back.

use serde::{Deserialize, Serialize};

use crate::types::{Action, TrafficLight};

/// Immutable log entry for one decision step.
///
/// The field order is the persisted column order of the history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Sweep axis label ("alpha" or "gamma")
    pub experiment: String,
    /// Global run identifier, monotone across the whole sweep
    pub run: usize,
    /// Trip index within the lifetime (1-based)
    pub trip: usize,
    /// Step index within the trip (1-based)
    pub step: usize,
    pub light: TrafficLight,
    /// Computed opposing-conflict flag of the abstracted state
    pub opposing: bool,
    pub oncoming: bool,
    pub left: bool,
    pub right: bool,
    pub waypoint: Action,
    /// Action actually executed
    pub action: Action,
    /// Greedy action at choice time
    pub greedy_action: Action,
    /// Greedy value estimate at choice time
    pub greedy_value: f64,
    pub reward: f64,
    pub alpha: f64,
    pub gamma: f64,
    /// Steps remaining before the trip fails, as reported by the environment
    pub deadline: i32,
    /// Whether the action was chosen by exploration rather than greedily
    pub explored: bool,
}

/// Ordered in-memory accumulation of step records for one lifetime.
///
/// Write-only from the learning loop's perspective; batches are taken out
/// whole at flush boundaries.
#[derive(Debug, Default)]
pub struct StepLog {
    records: Vec<StepRecord>,
}

impl StepLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    /// Take the accumulated batch, leaving the log empty.
    pub fn take(&mut self) -> Vec<StepRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
