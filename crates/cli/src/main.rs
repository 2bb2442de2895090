mod args;
mod output;

use args::{strip_program_alias, Cli};
use clap::Parser;
use color_eyre::eyre::WrapErr;
use pm_core::admin::ExternalAdmin;
use pm_core::config::{load_tool_settings, resolve, ResolvedParams};
use pm_core::config::resolver::SOURCE_ROOT_ENV;
use pm_core::engine::{PipelineEngine, PipelineError};
use pm_core::runner::{CommandRunner, TokioRunner};
use pm_core::supervisor::{OsSignals, RunOutcome};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse_from(strip_program_alias(std::env::args_os()));
    init_tracing(&cli.log_level);

    output::banner();

    let source_root = std::env::var(SOURCE_ROOT_ENV).ok();
    let ResolvedParams { pipeline, admin } =
        resolve(cli.raw_params(source_root)).map_err(PipelineError::from)?;
    let tools = load_tool_settings(cli.config.as_deref()).map_err(PipelineError::from)?;
    debug!(?pipeline, ?admin, ?tools, "Configuration resolved");

    let runner: Arc<dyn CommandRunner> = Arc::new(TokioRunner);
    let (events_tx, events_rx) = mpsc::channel(32);
    let printer = tokio::spawn(output::print_events(events_rx));

    let mut engine = PipelineEngine::new(Arc::clone(&runner), tools).with_events(events_tx);
    if let Some(program) = &cli.admin_bin {
        engine = engine.with_admin(Box::new(ExternalAdmin::new(runner, program)));
    }

    let mut signals = OsSignals::default();
    let result = engine.run(&pipeline, &admin, &mut signals).await;

    // Close the event channel so the printer drains and returns
    drop(engine);
    printer.await.wrap_err("event printer panicked")?;

    let RunOutcome { signal } = result?;
    info!(%signal, "Mock server stopped");
    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
