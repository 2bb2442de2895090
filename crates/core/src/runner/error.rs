//! Errors raised while running external commands.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    /// The program could not be started at all.
    #[error("Failed to spawn command '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The program started but the operating system gave no pid for it.
    #[error("No process id reported for '{program}'")]
    MissingPid { program: String },

    /// Waiting for the program to finish failed.
    #[error("Failed to wait for '{program}': {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },

    /// The kill request could not be delivered.
    #[error("Failed to kill process {pid}: {reason}")]
    Kill { pid: u32, reason: String },

    /// The working directory for a command does not exist.
    #[error("Working directory {0} does not exist")]
    MissingWorkingDir(PathBuf),
}
