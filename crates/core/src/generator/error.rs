//! Error types for source generation.

use crate::runner::RunnerError;
use pm_protocol::process_models::CommandStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for generation operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Errors that can occur while generating sources.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The generator could not be run.
    #[error(transparent)]
    Runner(#[from] RunnerError),

    /// The generator ran and reported failure.
    #[error("Fail on {program}: {status}")]
    GeneratorFailed {
        program: String,
        status: CommandStatus,
    },

    /// The metadata file was not produced or cannot be read.
    #[error("Unable to open {path}: {source}")]
    MetadataMissing {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The metadata file exists but does not have the expected shape.
    #[error("Malformed package metadata in {path}: {reason}")]
    MetadataMalformed { path: PathBuf, reason: String },
}
