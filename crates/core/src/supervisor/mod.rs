//! Supervision of the compiled mock server.
//!
//! The [`Supervisor`] launches the executable, hands its exit future to a
//! background task that reports through a oneshot channel, and then waits
//! on exactly one of two events: the process ending on its own, or a
//! termination request. Only the supervisory flow ever issues the kill.

pub mod error;
pub mod signals;

pub use error::{SupervisorError, SupervisorResult};
pub use signals::{ChannelTermination, OsSignals, TerminationSource, INTERCEPTED_SIGNALS};

use crate::runner::{CommandRunner, CommandSpec, ProcessKiller, RunnerError};
use pm_protocol::events::PipelineEvent;
use pm_protocol::process_models::{CommandStatus, SupervisorState, TerminationSignal};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A supervised run that ended through a termination request.
///
/// This is the only way a run ends without error. A server that ends on
/// its own, whatever its status, is reported as a [`SupervisorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// The request that stopped the server.
    pub signal: TerminationSignal,
}

/// A launched server waiting to be supervised.
pub struct RunningServer {
    pid: u32,
    completion: oneshot::Receiver<Result<CommandStatus, RunnerError>>,
    killer: Box<dyn ProcessKiller>,
    wait_task: JoinHandle<()>,
}

impl RunningServer {
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

/// Owns the lifecycle of the mock server executable.
pub struct Supervisor {
    runner: Arc<dyn CommandRunner>,
    state: SupervisorState,
    events_tx: Option<mpsc::Sender<PipelineEvent>>,
}

impl Supervisor {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            state: SupervisorState::NotStarted,
            events_tx: None,
        }
    }

    /// Report launch and shutdown notices on `events_tx`.
    pub fn with_events(mut self, events_tx: mpsc::Sender<PipelineEvent>) -> Self {
        self.events_tx = Some(events_tx);
        self
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Register for termination requests, launch `artifact` and supervise it
    /// until it exits or is killed.
    pub async fn run(
        &mut self,
        artifact: &Path,
        termination: &mut dyn TerminationSource,
    ) -> SupervisorResult<RunOutcome> {
        termination.register().map_err(SupervisorError::Signals)?;
        let server = self.launch(artifact).await?;
        self.supervise(server, termination).await
    }

    /// Start the executable and the background wait task.
    pub async fn launch(&mut self, artifact: &Path) -> SupervisorResult<RunningServer> {
        if self.state.is_terminal() {
            return Err(SupervisorError::AlreadyFinished { state: self.state });
        }
        self.ensure_transition(SupervisorState::Running)?;

        let spec = CommandSpec::new(artifact);
        let launched = self
            .runner
            .spawn(&spec)
            .await
            .map_err(SupervisorError::Launch)?;
        self.state = SupervisorState::Running;

        let pid = launched.pid;
        info!(pid, artifact = %artifact.display(), "Mock server started");
        self.emit(PipelineEvent::ServerStarted {
            pid,
            artifact: artifact.to_path_buf(),
        })
        .await;

        let (completion_tx, completion) = oneshot::channel();
        let exit = launched.exit;
        let wait_task = tokio::spawn(async move {
            let outcome = exit.await;
            debug!(pid, ?outcome, "Mock server wait finished");
            let _ = completion_tx.send(outcome);
        });

        Ok(RunningServer {
            pid,
            completion,
            killer: launched.killer,
            wait_task,
        })
    }

    /// Wait until the server exits or a termination request arrives.
    ///
    /// Only the first termination request is acted on. If the termination
    /// source closes, the supervisor keeps waiting for the process.
    pub async fn supervise(
        &mut self,
        mut server: RunningServer,
        termination: &mut dyn TerminationSource,
    ) -> SupervisorResult<RunOutcome> {
        let mut requests_open = true;
        loop {
            tokio::select! {
                completion = &mut server.completion => {
                    return self.on_exit(completion).await;
                }
                request = termination.next_request(), if requests_open => {
                    match request {
                        Some(signal) => return self.on_termination(server, signal).await,
                        None => {
                            debug!("Termination source closed");
                            requests_open = false;
                        }
                    }
                }
            }
        }
    }

    async fn on_exit(
        &mut self,
        completion: Result<Result<CommandStatus, RunnerError>, oneshot::error::RecvError>,
    ) -> SupervisorResult<RunOutcome> {
        self.ensure_transition(SupervisorState::Exited)?;
        self.state = SupervisorState::Exited;

        let status = match completion {
            Ok(Ok(status)) => status,
            Ok(Err(err)) => return Err(SupervisorError::Wait(err)),
            Err(_) => return Err(SupervisorError::MonitorLost),
        };

        self.emit(PipelineEvent::ServerExited { status }).await;
        if status.success() {
            warn!(%status, "Mock server exited without a termination request");
            Err(SupervisorError::ProcessExited { status })
        } else {
            Err(SupervisorError::ProcessFailed { status })
        }
    }

    async fn on_termination(
        &mut self,
        server: RunningServer,
        signal: TerminationSignal,
    ) -> SupervisorResult<RunOutcome> {
        self.ensure_transition(SupervisorState::Killed)?;

        info!(%signal, pid = server.pid, "Stopping mock server");
        self.emit(PipelineEvent::ShutdownRequested { signal }).await;

        // Best effort; there is no wait for confirmation.
        if let Err(err) = server.killer.kill() {
            warn!(error = %err, pid = server.pid, "Failed to kill mock server");
        }
        self.state = SupervisorState::Killed;
        drop(server.wait_task);

        Ok(RunOutcome { signal })
    }

    fn ensure_transition(&self, next: SupervisorState) -> SupervisorResult<()> {
        if self.state.can_transition_to(next) {
            Ok(())
        } else {
            Err(SupervisorError::InvalidTransition {
                from: self.state,
                to: next,
            })
        }
    }

    async fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.events_tx {
            let _ = tx.send(event).await;
        }
    }
}
