//! Hand-off to the admin (stub management) service.
//!
//! The admin service is an independent component. The pipeline only starts
//! it before generation and tells it which port, address and stub directory
//! to use; everything else about it is opaque here.

use crate::runner::{CommandRunner, CommandSpec, LaunchedProcess, RunnerError};
use async_trait::async_trait;
use pm_protocol::config_models::AdminOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Keeps a started admin service alive; kills it when dropped.
#[derive(Debug, Default)]
pub struct AdminHandle {
    process: Option<LaunchedProcess>,
}

impl AdminHandle {
    /// Handle for an admin service this process does not own.
    pub fn detached() -> Self {
        Self { process: None }
    }

    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().map(|p| p.pid)
    }
}

impl Drop for AdminHandle {
    fn drop(&mut self) {
        if let Some(process) = self.process.take() {
            if let Err(err) = process.killer.kill() {
                warn!(error = %err, pid = process.pid, "Failed to stop admin service");
            }
        }
    }
}

/// Starts the admin service.
#[async_trait]
pub trait AdminLauncher: Send + Sync {
    async fn start(&self, options: &AdminOptions) -> Result<AdminHandle, RunnerError>;
}

/// The admin service is run by someone else; only log where it is expected.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedAdmin;

#[async_trait]
impl AdminLauncher for DetachedAdmin {
    async fn start(&self, options: &AdminOptions) -> Result<AdminHandle, RunnerError> {
        info!(
            port = options.port,
            bind_addr = %options.bind_addr,
            "Admin service is managed externally"
        );
        Ok(AdminHandle::detached())
    }
}

/// Spawns an admin service executable as a child process.
pub struct ExternalAdmin {
    runner: Arc<dyn CommandRunner>,
    program: PathBuf,
}

impl ExternalAdmin {
    pub fn new(runner: Arc<dyn CommandRunner>, program: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }
}

#[async_trait]
impl AdminLauncher for ExternalAdmin {
    async fn start(&self, options: &AdminOptions) -> Result<AdminHandle, RunnerError> {
        let spec = CommandSpec::new(&self.program).args(admin_args(options));
        let process = self.runner.spawn(&spec).await?;
        info!(pid = process.pid, port = options.port, "Admin service started");
        Ok(AdminHandle {
            process: Some(process),
        })
    }
}

/// `--port <port> [--listen <addr>] [--stub <dir>]`
pub fn admin_args(options: &AdminOptions) -> Vec<String> {
    let mut args = vec!["--port".to_string(), options.port.to_string()];
    if !options.bind_addr.is_empty() {
        args.push("--listen".to_string());
        args.push(options.bind_addr.clone());
    }
    if !options.stub_path.is_empty() {
        args.push("--stub".to_string());
        args.push(options.stub_path.clone());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_args_minimal() {
        let options = AdminOptions {
            stub_path: String::new(),
            port: 4771,
            bind_addr: String::new(),
        };
        assert_eq!(admin_args(&options), vec!["--port", "4771"]);
    }

    #[test]
    fn test_admin_args_full() {
        let options = AdminOptions {
            stub_path: "/stubs".to_string(),
            port: 9000,
            bind_addr: "0.0.0.0".to_string(),
        };
        assert_eq!(
            admin_args(&options),
            vec!["--port", "9000", "--listen", "0.0.0.0", "--stub", "/stubs"]
        );
    }

    #[tokio::test]
    async fn test_detached_admin_owns_nothing() {
        let handle = DetachedAdmin
            .start(&AdminOptions::default())
            .await
            .expect("detached admin never fails");
        assert_eq!(handle.pid(), None);
    }
}
