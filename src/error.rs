//! Error types for the TSP genetic algorithm.

use thiserror::Error;

/// Errors raised by graph queries, fitness evaluation and the evolution driver
#[derive(Debug, Error)]
pub enum TspError {
    /// Neighbor query for a city that was never registered
    #[error("City '{0}' not found in the graph")]
    CityNotFound(String),

    /// A tour step has no stored connection
    #[error("No connection from '{from}' to '{to}'")]
    MissingEdge { from: String, to: String },

    /// Parameter outside its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Malformed graph or configuration file
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, TspError>;
