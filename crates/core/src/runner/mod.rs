//! External command execution.
//!
//! Every external program the pipeline touches (generator, compiler, the
//! compiled server, the admin service) goes through the [`CommandRunner`]
//! trait. Production code uses [`TokioRunner`]; tests substitute fakes that
//! never spawn a real process.

pub mod command;
pub mod error;
pub mod tokio_runner;

pub use command::CommandSpec;
pub use error::RunnerError;
pub use tokio_runner::TokioRunner;

use async_trait::async_trait;
use pm_protocol::process_models::CommandStatus;
use std::future::Future;
use std::pin::Pin;

/// Future that resolves once a launched process has terminated.
pub type ExitFuture = Pin<Box<dyn Future<Output = Result<CommandStatus, RunnerError>> + Send>>;

/// Sends a forced kill to a launched process.
pub trait ProcessKiller: Send + Sync {
    /// Best effort: a process that is already gone counts as killed.
    fn kill(&self) -> Result<(), RunnerError>;
}

/// A process started with [`CommandRunner::spawn`].
///
/// The exit future and the killer are separate so that one task can wait
/// for termination while another decides whether to kill.
pub struct LaunchedProcess {
    pub pid: u32,
    pub exit: ExitFuture,
    pub killer: Box<dyn ProcessKiller>,
}

impl std::fmt::Debug for LaunchedProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchedProcess")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

/// Runs external commands with inherited output streams.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion and report how it exited.
    ///
    /// A nonzero exit is not an error at this level; callers decide.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandStatus, RunnerError>;

    /// Start a command without waiting for it.
    async fn spawn(&self, spec: &CommandSpec) -> Result<LaunchedProcess, RunnerError>;
}
