//! Top-level error type for a pipeline run.
//!
//! Every stage error funnels into [`PipelineError`]. The variants follow the
//! order in which a run can fail; each one ends the run.

use crate::builder::BuildError;
use crate::config::ConfigError;
use crate::generator::GenerateError;
use crate::supervisor::SupervisorError;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Missing or unusable input.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The generator failed or its metadata could not be loaded.
    #[error("Code generation failed: {0}")]
    Generation(#[from] GenerateError),

    /// The compiler failed.
    #[error("Build failed: {0}")]
    Build(#[from] BuildError),

    /// A child process (admin service or mock server) could not start.
    #[error("Launch failed: {0}")]
    Launch(#[source] SupervisorError),

    /// The mock server ended abnormally after launch.
    #[error("Mock server failed: {0}")]
    Runtime(#[source] SupervisorError),
}

impl From<SupervisorError> for PipelineError {
    fn from(err: SupervisorError) -> Self {
        if err.is_launch_failure() {
            PipelineError::Launch(err)
        } else {
            PipelineError::Runtime(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_protocol::process_models::CommandStatus;

    #[test]
    fn test_supervisor_errors_split_by_phase() {
        let launch: PipelineError = SupervisorError::Signals(std::io::Error::new(
            std::io::ErrorKind::Other,
            "no signals",
        ))
        .into();
        assert!(matches!(launch, PipelineError::Launch(_)));

        let runtime: PipelineError = SupervisorError::ProcessFailed {
            status: CommandStatus::from_code(2),
        }
        .into();
        assert!(matches!(runtime, PipelineError::Runtime(_)));
        assert_eq!(
            runtime.to_string(),
            "Mock server failed: mock server exit status 2"
        );
    }

    #[test]
    fn test_unrequested_clean_exit_is_runtime_failure() {
        let err: PipelineError = SupervisorError::ProcessExited {
            status: CommandStatus::from_code(0),
        }
        .into();
        assert!(matches!(err, PipelineError::Runtime(_)));
        assert_eq!(
            err.to_string(),
            "Mock server failed: mock server exited unexpectedly (exit status 0)"
        );
    }

    #[test]
    fn test_config_error_message() {
        let err: PipelineError = ConfigError::MissingProtoFiles.into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Need at least one definition file"
        );
    }
}
