//! CSV implementation of the history store.
//!
//! The persisted history is one flat CSV table, one row per decision step.
//! The format carries no incremental-append guarantee, so every flush reads
//! the existing file, concatenates the batch, and writes the whole table
//! back. One store instance per process is the single writer.

use std::path::{Path, PathBuf};

use crate::{Result, error::Error, ports::HistoryStore, record::StepRecord};

/// CSV-file-backed history store.
#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    /// Create a store persisting to the given file.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file the store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for CsvHistoryStore {
    fn load(&self) -> Result<Vec<StepRecord>> {
        // A history that was never written is empty, not an error.
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }

    fn merge_append(&self, batch: &[StepRecord]) -> Result<()> {
        let mut merged = self.load()?;
        merged.extend_from_slice(batch);

        let mut writer = csv::Writer::from_path(&self.path)?;
        for record in &merged {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush history file {:?}", self.path),
            source,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::types::{Action, TrafficLight};

    fn record(run: usize, step: usize) -> StepRecord {
        StepRecord {
            experiment: "alpha".to_string(),
            run,
            trip: 1,
            step,
            light: TrafficLight::Red,
            opposing: true,
            oncoming: true,
            left: false,
            right: false,
            waypoint: Action::Forward,
            action: Action::Idle,
            greedy_action: Action::Idle,
            greedy_value: 0.0,
            reward: 0.0,
            alpha: 0.35,
            gamma: 0.3,
            deadline: 25,
            explored: true,
        }
    }

    #[test]
    fn missing_file_loads_as_empty_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = CsvHistoryStore::new(temp_dir.path().join("history.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn merge_append_roundtrips_records() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = CsvHistoryStore::new(temp_dir.path().join("history.csv"));

        store
            .merge_append(&[record(0, 1), record(0, 2)])
            .expect("Failed to write batch");

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], record(0, 1));
        assert_eq!(loaded[1], record(0, 2));
    }

    #[test]
    fn merge_append_preserves_existing_rows() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = CsvHistoryStore::new(temp_dir.path().join("history.csv"));

        store.merge_append(&[record(0, 1)]).unwrap();
        store.merge_append(&[record(1, 1), record(1, 2)]).unwrap();

        let loaded = store.load().unwrap();
        let runs: Vec<usize> = loaded.iter().map(|r| r.run).collect();
        assert_eq!(runs, vec![0, 1, 1]);
    }

    #[test]
    fn write_to_invalid_path_returns_error() {
        let store = CsvHistoryStore::new("/nonexistent_dir_52114/history.csv");
        assert!(store.merge_append(&[record(0, 1)]).is_err());
    }
}
