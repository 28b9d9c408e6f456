//! Errors raised before the engine runs: reading config and roster files.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RotaError>;

#[derive(Debug, Error)]
pub enum RotaError {
    #[error("config file {0} not found")]
    ConfigNotFound(PathBuf),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("roster is missing the {0:?} column")]
    MissingColumn(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
