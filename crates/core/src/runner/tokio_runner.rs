//! [`CommandRunner`] backed by `tokio::process`.

use super::{CommandRunner, CommandSpec, ExitFuture, LaunchedProcess, ProcessKiller, RunnerError};
use async_trait::async_trait;
use pm_protocol::process_models::CommandStatus;
use std::process::{ExitStatus, Stdio};
use std::sync::Mutex;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Runs real processes. Output streams are inherited so that generator,
/// compiler and server output shows up directly in the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

impl TokioRunner {
    fn command(spec: &CommandSpec) -> Result<Command, RunnerError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.working_dir {
            if !dir.is_dir() {
                return Err(RunnerError::MissingWorkingDir(dir.clone()));
            }
            cmd.current_dir(dir);
        }
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        Ok(cmd)
    }
}

#[async_trait]
impl CommandRunner for TokioRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandStatus, RunnerError> {
        debug!(command = %spec, "Running command");
        let status = Self::command(spec)?
            .status()
            .await
            .map_err(|source| RunnerError::Spawn {
                program: spec.program_name(),
                source,
            })?;
        Ok(to_command_status(status))
    }

    async fn spawn(&self, spec: &CommandSpec) -> Result<LaunchedProcess, RunnerError> {
        debug!(command = %spec, "Spawning command");
        let program = spec.program_name();
        let mut child = Self::command(spec)?
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: program.clone(),
                source,
            })?;

        let pid = child.id().ok_or_else(|| RunnerError::MissingPid {
            program: program.clone(),
        })?;

        let (kill_tx, kill_rx) = oneshot::channel();
        let exit: ExitFuture = Box::pin(async move {
            let waited = tokio::select! {
                status = child.wait() => status,
                Ok(()) = kill_rx => {
                    if let Err(err) = child.start_kill() {
                        warn!(pid, error = %err, "Failed to kill child process");
                    }
                    child.wait().await
                }
            };
            waited
                .map(to_command_status)
                .map_err(|source| RunnerError::Wait { program, source })
        });

        Ok(LaunchedProcess {
            pid,
            exit,
            killer: Box::new(ChildKiller {
                kill_tx: Mutex::new(Some(kill_tx)),
            }),
        })
    }
}

/// Asks the task waiting on a child to kill it.
///
/// The kill goes through the owned child handle, so a process that was
/// already reaped is never signalled by pid.
#[derive(Debug)]
pub struct ChildKiller {
    kill_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl ProcessKiller for ChildKiller {
    fn kill(&self) -> Result<(), RunnerError> {
        let sender = match self.kill_tx.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(sender) = sender {
            // A closed receiver means the child has already been reaped
            let _ = sender.send(());
        }
        Ok(())
    }
}

fn to_command_status(status: ExitStatus) -> CommandStatus {
    if let Some(code) = status.code() {
        return CommandStatus::from_code(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return CommandStatus::from_signal(signal);
        }
    }
    CommandStatus {
        code: None,
        signal: None,
    }
}
