//! Compilation of the generated sources into the mock server executable.

use crate::config::ToolSettings;
use crate::runner::{CommandRunner, CommandSpec, RunnerError};
use pm_protocol::config_models::PipelineConfig;
use pm_protocol::process_models::CommandStatus;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while compiling the server.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("{program} exited with {status}")]
    CompilerFailed {
        program: String,
        status: CommandStatus,
    },
}

/// Compiles the fixed entry point in the output directory.
pub struct Builder {
    runner: Arc<dyn CommandRunner>,
    tools: ToolSettings,
}

impl Builder {
    pub fn new(runner: Arc<dyn CommandRunner>, tools: ToolSettings) -> Self {
        Self { runner, tools }
    }

    /// Path of the executable this builder produces for `config`.
    pub fn artifact_path(&self, config: &PipelineConfig) -> PathBuf {
        config.output_path(&self.tools.artifact)
    }

    /// Compile the server and return the path to the executable.
    ///
    /// The compiler runs with the output directory as its working directory
    /// so that relative references resolve against the generated tree.
    pub async fn build(&self, config: &PipelineConfig) -> Result<PathBuf, BuildError> {
        let artifact = self.artifact_path(config);
        let spec = CommandSpec::new(&self.tools.compiler)
            .args(build_args(config, &self.tools))
            .current_dir(&config.output_dir);
        info!(artifact = %artifact.display(), "Building mock server");

        let status = self.runner.run(&spec).await?;
        if !status.success() {
            return Err(BuildError::CompilerFailed {
                program: spec.program_name(),
                status,
            });
        }
        Ok(artifact)
    }
}

/// `build -o <out>/<artifact> <out>/<entry point>`
pub fn build_args(config: &PipelineConfig, tools: &ToolSettings) -> Vec<String> {
    vec![
        "build".to_string(),
        "-o".to_string(),
        config.output_path(&tools.artifact).display().to_string(),
        config.output_path(&tools.entry_point).display().to_string(),
    ]
}
