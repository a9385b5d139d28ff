//! History port - persistence of accumulated step records
//!
//! The history file is append-accumulated across lifetimes within a process,
//! but the format has no incremental-append guarantee, so every flush is a
//! read-merge-write: load whatever is already persisted, concatenate the new
//! batch, write the whole file back. All persistence must go through a single
//! store instance to avoid lost updates.

use crate::{Result, record::StepRecord};

/// Port for persisting batches of step records.
pub trait HistoryStore {
    /// Load the full persisted history.
    ///
    /// A store that has never been written to reports an empty history, not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error if existing history is present but unreadable.
    fn load(&self) -> Result<Vec<StepRecord>>;

    /// Merge a batch with the persisted history and write the whole of it
    /// back.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read or rewritten. Callers
    /// must keep the batch and retry at the next flush boundary rather than
    /// discard it.
    fn merge_append(&self, batch: &[StepRecord]) -> Result<()>;
}
