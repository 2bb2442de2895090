//! Terminal output for pipeline progress.

use colored::Colorize;
use pm_protocol::events::{PipelineEvent, Stage};
use tokio::sync::mpsc::Receiver;

pub fn banner() {
    println!("{}", "Starting protomock".bold());
}

/// Print events until every sender is gone.
pub async fn print_events(mut events_rx: Receiver<PipelineEvent>) {
    while let Some(event) = events_rx.recv().await {
        if let Some(line) = render(&event) {
            println!("{line}");
        }
    }
}

fn render(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::StageStarted { stage } => Some(format!(
            "{} {}",
            "==>".blue().bold(),
            stage_label(*stage)
        )),
        PipelineEvent::StageFinished { .. } => None,
        PipelineEvent::ServerStarted { pid, .. } => {
            Some(format!("mock server pid: {}", pid.to_string().green()))
        }
        PipelineEvent::ShutdownRequested { signal } => Some(format!(
            "{} ({signal})",
            "Stopping mock server".yellow().bold()
        )),
        PipelineEvent::ServerExited { status } if status.success() => {
            Some(format!("mock server exited ({status})"))
        }
        PipelineEvent::ServerExited { status } => {
            Some(format!("{} ({status})", "mock server failed".red().bold()))
        }
    }
}

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Admin => "Starting admin service",
        Stage::Generate => "Generating sources",
        Stage::Build => "Building mock server",
        Stage::Run => "Running mock server",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_protocol::process_models::{CommandStatus, TerminationSignal};
    use std::path::PathBuf;

    fn plain(event: PipelineEvent) -> Option<String> {
        colored::control::set_override(false);
        render(&event)
    }

    #[test]
    fn test_render_server_lifecycle() {
        assert_eq!(
            plain(PipelineEvent::ServerStarted {
                pid: 4242,
                artifact: PathBuf::from("/out/grpcserver"),
            })
            .as_deref(),
            Some("mock server pid: 4242")
        );
        assert_eq!(
            plain(PipelineEvent::ShutdownRequested {
                signal: TerminationSignal::Terminate,
            })
            .as_deref(),
            Some("Stopping mock server (SIGTERM)")
        );
        assert_eq!(
            plain(PipelineEvent::ServerExited {
                status: CommandStatus::from_code(3),
            })
            .as_deref(),
            Some("mock server failed (exit status 3)")
        );
    }

    #[test]
    fn test_stage_finished_is_silent() {
        assert_eq!(
            plain(PipelineEvent::StageFinished {
                stage: Stage::Build
            }),
            None
        );
        assert_eq!(
            plain(PipelineEvent::StageStarted {
                stage: Stage::Generate
            })
            .as_deref(),
            Some("==> Generating sources")
        );
    }
}
