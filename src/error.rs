//! Error types for the gridcab crate

use thiserror::Error;

/// Main error type for the gridcab crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("sensor reading violates the environment contract: {detail}")]
    SensorContract { detail: String },

    #[error("hyperparameter {name} out of range: {value}")]
    Hyperparameter { name: &'static str, value: f64 },

    #[error("environment fault during {operation}: {detail}")]
    Environment { operation: String, detail: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
