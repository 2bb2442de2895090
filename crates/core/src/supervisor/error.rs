//! Error types for the process supervisor.

use crate::runner::RunnerError;
use pm_protocol::process_models::{CommandStatus, SupervisorState};
use thiserror::Error;

pub type SupervisorResult<T> = Result<T, SupervisorError>;

#[derive(Error, Debug)]
pub enum SupervisorError {
    /// Termination signals could not be registered.
    #[error("Failed to register termination signals: {0}")]
    Signals(#[source] std::io::Error),

    /// The server executable could not be started.
    #[error(transparent)]
    Launch(RunnerError),

    /// The server ended on its own with a failure status.
    #[error("mock server {status}")]
    ProcessFailed { status: CommandStatus },

    /// The server ended on its own with a success status. Only a
    /// termination request may end a run without error.
    #[error("mock server exited unexpectedly ({status})")]
    ProcessExited { status: CommandStatus },

    /// Waiting for the server failed.
    #[error(transparent)]
    Wait(RunnerError),

    /// The background wait task went away without reporting.
    #[error("Process monitor task died unexpectedly")]
    MonitorLost,

    /// The server already ran to completion; it is never restarted.
    #[error("Mock server already finished in state {state:?}")]
    AlreadyFinished { state: SupervisorState },

    /// A lifecycle step was attempted out of order.
    #[error("Invalid supervisor transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: SupervisorState,
        to: SupervisorState,
    },
}

impl SupervisorError {
    /// Whether the failure happened before the server was up and running.
    pub fn is_launch_failure(&self) -> bool {
        matches!(
            self,
            SupervisorError::Signals(_)
                | SupervisorError::Launch(_)
                | SupervisorError::AlreadyFinished { .. }
                | SupervisorError::InvalidTransition { .. }
        )
    }
}
