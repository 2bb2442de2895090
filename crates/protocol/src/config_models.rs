//! Resolved configuration models.
//!
//! A [`PipelineConfig`] is produced exactly once per run from the raw CLI
//! input and then handed by shared reference to every pipeline stage.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port the generated mock server binds.
pub const DEFAULT_GRPC_PORT: u16 = 4770;

/// Default port of the admin (stub management) service.
pub const DEFAULT_ADMIN_PORT: u16 = 4771;

/// Default comma separated import search path.
pub const DEFAULT_IMPORTS: &str = "/protobuf";

/// Immutable configuration for a single generate, build and run cycle.
///
/// # Invariants
///
/// - `proto_paths` is never empty.
/// - `output_dir` ends with a path separator and exists on disk once the
///   resolver has returned it.
/// - `imports` keeps the order given on the command line; earlier entries
///   take precedence when the generator searches for imports.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Definition files passed to the generator, in command line order.
    pub proto_paths: Vec<PathBuf>,

    /// Port of the admin service, baked into the generated scaffold.
    pub admin_port: u16,

    /// Address the mock server binds. Empty means local only.
    pub grpc_address: String,

    /// Port the mock server binds.
    pub grpc_port: u16,

    /// Root directory for generated sources and the compiled artifact.
    pub output_dir: PathBuf,

    /// Additional import search roots.
    pub imports: Vec<PathBuf>,
}

impl PipelineConfig {
    /// The definition file whose directory acts as the primary search root.
    pub fn primary_proto(&self) -> Option<&Path> {
        self.proto_paths.first().map(PathBuf::as_path)
    }

    /// Join a file name onto the output directory.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// Options handed to the admin service before generation starts.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminOptions {
    /// Directory with preloaded stub definitions. Empty when unset.
    pub stub_path: String,

    /// Port the admin service listens on.
    pub port: u16,

    /// Address the admin service binds. Empty means local only.
    pub bind_addr: String,
}
