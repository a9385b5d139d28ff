//! Ports (trait boundaries) for external dependencies.
//!
//! The environment/simulator, history persistence, and sweep observation are
//! all consumed through these traits; adapters implement them in the
//! infrastructure layer.

pub mod environment;
pub mod history;
pub mod observer;

pub use environment::Environment;
pub use history::HistoryStore;
pub use observer::SweepObserver;
