//! Adapters implementing the crate's ports: CSV-backed history persistence
//! and the reference grid-world environment.

pub mod csv_history;
pub mod grid_world;

pub use csv_history::CsvHistoryStore;
pub use grid_world::GridWorld;
