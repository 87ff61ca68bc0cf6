//! Error types for the modplan command line.

use modplan_core::PlanError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or editing the plan failed.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write to the output stream.
    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to write CSV data.
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// The requested floor does not exist.
    #[error("floor index {index} is out of range (plan has {count} floor(s))")]
    FloorOutOfRange { index: usize, count: usize },

    /// The plan breaks one or more invariants.
    #[error("{0} invariant violation(s) found")]
    Violations(usize),
}
