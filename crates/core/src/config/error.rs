//! Error types for configuration resolution.
//!
//! This module defines all errors that can occur while resolving command line
//! parameters and loading the tool settings file.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No definition files were given on the command line.
    #[error("Need at least one definition file")]
    MissingProtoFiles,

    /// Neither an output directory nor a source root was provided.
    #[error("Output directory is not provided and {env_var} is empty")]
    NoOutputRoot { env_var: &'static str },

    /// The output directory could not be created or inspected.
    #[error("Failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The output path exists but cannot hold generated files.
    #[error("Output path {path} is not a writable directory")]
    OutputNotWritable { path: PathBuf },

    /// Failed to read the tool settings file from disk.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the tool settings file.
    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A tool setting is present but unusable.
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

/// Type alias for Result with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;
