//! Pipeline execution engine.
//!
//! The PipelineEngine runs the stages strictly in order: admin hand-off,
//! source generation, compilation, then supervision of the compiled server.
//! A failing stage ends the run; later stages never start.

pub mod error;

pub use error::{PipelineError, PipelineResult};

use crate::admin::{AdminLauncher, DetachedAdmin};
use crate::builder::Builder;
use crate::config::ToolSettings;
use crate::generator::CodeGenerator;
use crate::runner::CommandRunner;
use crate::supervisor::{RunOutcome, Supervisor, SupervisorError, TerminationSource};
use pm_protocol::config_models::{AdminOptions, PipelineConfig};
use pm_protocol::events::{PipelineEvent, Stage};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tracing::info;

/// The main pipeline execution engine.
pub struct PipelineEngine {
    runner: Arc<dyn CommandRunner>,
    tools: ToolSettings,
    admin: Box<dyn AdminLauncher>,
    events_tx: Option<Sender<PipelineEvent>>,
}

impl PipelineEngine {
    /// Create an engine that drives external programs through `runner`.
    ///
    /// The admin service defaults to [`DetachedAdmin`].
    pub fn new(runner: Arc<dyn CommandRunner>, tools: ToolSettings) -> Self {
        Self {
            runner,
            tools,
            admin: Box::new(DetachedAdmin),
            events_tx: None,
        }
    }

    pub fn with_admin(mut self, admin: Box<dyn AdminLauncher>) -> Self {
        self.admin = admin;
        self
    }

    /// Send progress events to `events_tx`.
    pub fn with_events(mut self, events_tx: Sender<PipelineEvent>) -> Self {
        self.events_tx = Some(events_tx);
        self
    }

    /// Execute a full run and return how the server ended.
    ///
    /// This is the main entry point. It:
    /// 1. Starts the admin service
    /// 2. Generates sources and loads the package alias metadata
    /// 3. Compiles the mock server
    /// 4. Launches and supervises it until it exits or `termination` fires
    ///
    /// # Errors
    ///
    /// Returns the `PipelineError` of the first stage that fails. A server
    /// that ends on its own, even with a success status, is a
    /// `PipelineError::Runtime`; only a termination request returns `Ok`.
    pub async fn run(
        &self,
        config: &PipelineConfig,
        admin_options: &AdminOptions,
        termination: &mut dyn TerminationSource,
    ) -> PipelineResult<RunOutcome> {
        self.stage_started(Stage::Admin).await;
        let _admin = self
            .admin
            .start(admin_options)
            .await
            .map_err(|e| PipelineError::Launch(SupervisorError::Launch(e)))?;
        self.stage_finished(Stage::Admin).await;

        self.stage_started(Stage::Generate).await;
        let generator = CodeGenerator::new(Arc::clone(&self.runner), self.tools.clone());
        // Not consumed by the build yet
        let aliases = generator.generate(config).await?;
        info!(aliases = aliases.len(), "Sources generated");
        self.stage_finished(Stage::Generate).await;

        self.stage_started(Stage::Build).await;
        let builder = Builder::new(Arc::clone(&self.runner), self.tools.clone());
        let artifact = builder.build(config).await?;
        self.stage_finished(Stage::Build).await;

        self.stage_started(Stage::Run).await;
        let mut supervisor = Supervisor::new(Arc::clone(&self.runner));
        if let Some(tx) = &self.events_tx {
            supervisor = supervisor.with_events(tx.clone());
        }
        let outcome = supervisor.run(&artifact, termination).await?;
        self.stage_finished(Stage::Run).await;

        Ok(outcome)
    }

    async fn stage_started(&self, stage: Stage) {
        info!(?stage, "Stage started");
        self.emit(PipelineEvent::StageStarted { stage }).await;
    }

    async fn stage_finished(&self, stage: Stage) {
        self.emit(PipelineEvent::StageFinished { stage }).await;
    }

    async fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.events_tx {
            let _ = tx.send(event).await;
        }
    }
}
