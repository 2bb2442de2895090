//! In-memory command runner for deterministic testing.

use async_trait::async_trait;
use pm_core::runner::{
    CommandRunner, CommandSpec, ExitFuture, LaunchedProcess, ProcessKiller, RunnerError,
};
use pm_protocol::process_models::CommandStatus;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub type ServerExitSender = oneshot::Sender<Result<CommandStatus, RunnerError>>;

/// Records every invocation and answers with scripted results.
///
/// - `run` returns the status registered for the program (success by default)
/// - `spawn` returns a process whose exit is driven by [`FakeRunner::server_exit`]
///   or never completes if no sender was requested
#[derive(Default)]
pub struct FakeRunner {
    runs: Mutex<Vec<CommandSpec>>,
    spawns: Mutex<Vec<CommandSpec>>,
    statuses: Mutex<HashMap<PathBuf, CommandStatus>>,
    outputs: Mutex<HashMap<PathBuf, (PathBuf, String)>>,
    exits: Mutex<Vec<oneshot::Receiver<Result<CommandStatus, RunnerError>>>>,
    spawn_fails: bool,
    kills: Arc<AtomicUsize>,
    next_pid: AtomicUsize,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            next_pid: AtomicUsize::new(1000),
            ..Self::default()
        }
    }

    /// Make `program` exit with `code` when run.
    pub fn with_exit_code(self, program: &str, code: i32) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(PathBuf::from(program), CommandStatus::from_code(code));
        self
    }

    /// Write `content` to `path` whenever `program` runs successfully.
    pub fn with_output(self, program: &str, path: PathBuf, content: &str) -> Self {
        self.outputs
            .lock()
            .unwrap()
            .insert(PathBuf::from(program), (path, content.to_string()));
        self
    }

    /// Make every spawn fail as if the executable were missing.
    pub fn with_failing_spawn(mut self) -> Self {
        self.spawn_fails = true;
        self
    }

    /// Control the exit of the next spawned process.
    pub fn server_exit(&self) -> ServerExitSender {
        let (tx, rx) = oneshot::channel();
        self.exits.lock().unwrap().push(rx);
        tx
    }

    /// Programs passed to `run`, in call order.
    pub fn run_programs(&self) -> Vec<String> {
        self.runs
            .lock()
            .unwrap()
            .iter()
            .map(CommandSpec::program_name)
            .collect()
    }

    pub fn runs(&self) -> Vec<CommandSpec> {
        self.runs.lock().unwrap().clone()
    }

    pub fn spawns(&self) -> Vec<CommandSpec> {
        self.spawns.lock().unwrap().clone()
    }

    pub fn kill_count(&self) -> usize {
        self.kills.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandStatus, RunnerError> {
        self.runs.lock().unwrap().push(spec.clone());

        let status = self
            .statuses
            .lock()
            .unwrap()
            .get(&spec.program)
            .copied()
            .unwrap_or_else(|| CommandStatus::from_code(0));

        if status.success() {
            if let Some((path, content)) = self.outputs.lock().unwrap().get(&spec.program) {
                std::fs::write(path, content).map_err(|source| RunnerError::Wait {
                    program: spec.program_name(),
                    source,
                })?;
            }
        }
        Ok(status)
    }

    async fn spawn(&self, spec: &CommandSpec) -> Result<LaunchedProcess, RunnerError> {
        self.spawns.lock().unwrap().push(spec.clone());

        if self.spawn_fails {
            return Err(RunnerError::Spawn {
                program: spec.program_name(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }

        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst) as u32;
        let program = spec.program_name();
        let receiver = {
            let mut exits = self.exits.lock().unwrap();
            if exits.is_empty() {
                None
            } else {
                Some(exits.remove(0))
            }
        };

        let exit: ExitFuture = match receiver {
            Some(rx) => Box::pin(async move {
                match rx.await {
                    Ok(result) => result,
                    Err(_) => Err(RunnerError::Wait {
                        program,
                        source: std::io::Error::new(std::io::ErrorKind::Other, "exit sender dropped"),
                    }),
                }
            }),
            None => Box::pin(std::future::pending::<Result<CommandStatus, RunnerError>>()),
        };

        Ok(LaunchedProcess {
            pid,
            exit,
            killer: Box::new(CountingKiller {
                kills: Arc::clone(&self.kills),
            }),
        })
    }
}

struct CountingKiller {
    kills: Arc<AtomicUsize>,
}

impl ProcessKiller for CountingKiller {
    fn kill(&self) -> Result<(), RunnerError> {
        self.kills.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
