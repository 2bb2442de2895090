//! Configuration resolution.
//!
//! This module turns raw command line input into the immutable
//! [`PipelineConfig`](pm_protocol::PipelineConfig) and loads the optional
//! tool settings file that names the external programs the pipeline drives.

pub mod error;
pub mod resolver;
pub mod tools;

pub use error::{ConfigError, ConfigResult};
pub use resolver::{resolve, RawParams, ResolvedParams};
pub use tools::{load_tool_settings, ToolSettings};
