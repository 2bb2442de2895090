//! Assertion helpers for pipeline events.

use pm_protocol::events::{PipelineEvent, Stage};
use tokio::sync::mpsc::Receiver;

/// Collect everything already sent on the channel.
pub fn drain(rx: &mut Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Stages that were started, in order.
pub fn started_stages(events: &[PipelineEvent]) -> Vec<Stage> {
    events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::StageStarted { stage } => Some(*stage),
            _ => None,
        })
        .collect()
}

/// Stages that finished, in order.
pub fn finished_stages(events: &[PipelineEvent]) -> Vec<Stage> {
    events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::StageFinished { stage } => Some(*stage),
            _ => None,
        })
        .collect()
}

pub fn count_shutdown_notices(events: &[PipelineEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::ShutdownRequested { .. }))
        .count()
}

pub fn has_server_started(events: &[PipelineEvent]) -> bool {
    events
        .iter()
        .any(|e| matches!(e, PipelineEvent::ServerStarted { .. }))
}
