// Error types for the ambient layers (input reading, configuration, CLI lookups).
// The analysis pipeline itself never fails.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodelensError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown pattern: {0}. Run `codelens patterns` to list known ids")]
    UnknownPattern(String),
    #[error("Unknown explanation level: {0}. Supported: simplified, technical")]
    UnknownLevel(String),
    #[error("Unknown category: {0}. Supported: algorithm, data-structure, design-pattern, anti-pattern")]
    UnknownCategory(String),
}

pub type Result<T> = std::result::Result<T, CodelensError>;
