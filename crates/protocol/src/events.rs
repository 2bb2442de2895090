//! Progress events emitted by the pipeline engine.
//!
//! The engine sends these through an mpsc channel; the CLI prints them.

use crate::process_models::{CommandStatus, TerminationSignal};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pipeline stage, in execution order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Admin,
    Generate,
    Build,
    Run,
}

/// Events sent from the engine to whoever drives it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PipelineEvent {
    /// A stage has begun.
    StageStarted { stage: Stage },

    /// A stage finished successfully.
    StageFinished { stage: Stage },

    /// The mock server was launched.
    ServerStarted {
        pid: u32,
        #[serde(rename = "artifactPath")]
        artifact: PathBuf,
    },

    /// A termination request arrived; the server is about to be killed.
    ShutdownRequested { signal: TerminationSignal },

    /// The mock server ended on its own.
    ServerExited { status: CommandStatus },
}
