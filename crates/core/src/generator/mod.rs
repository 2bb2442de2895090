//! Source generation.
//!
//! [`CodeGenerator`] runs the external generator over the definition files
//! and then loads the package alias metadata it leaves in the output
//! directory.

pub mod error;
pub mod metadata;

pub use error::{GenerateError, GenerateResult};
pub use metadata::load_alias_map;

use crate::config::ToolSettings;
use crate::runner::{CommandRunner, CommandSpec};
use pm_protocol::config_models::PipelineConfig;
use pm_protocol::metadata_models::PackageAliasMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Drives the external source generator.
pub struct CodeGenerator {
    runner: Arc<dyn CommandRunner>,
    tools: ToolSettings,
}

impl CodeGenerator {
    pub fn new(runner: Arc<dyn CommandRunner>, tools: ToolSettings) -> Self {
        Self { runner, tools }
    }

    /// Generate stubs and the mock scaffold, then load the alias metadata.
    ///
    /// # Errors
    ///
    /// - `GenerateError::Runner` if the generator cannot be started
    /// - `GenerateError::GeneratorFailed` on a nonzero exit
    /// - `GenerateError::MetadataMissing` / `MetadataMalformed` if the
    ///   metadata file is absent or has the wrong shape
    ///
    /// Partial output is left in place on failure.
    pub async fn generate(&self, config: &PipelineConfig) -> GenerateResult<PackageAliasMap> {
        let spec = CommandSpec::new(&self.tools.generator).args(generator_args(config, &self.tools));
        info!(protos = config.proto_paths.len(), "Generating sources");

        let status = self.runner.run(&spec).await?;
        if !status.success() {
            return Err(GenerateError::GeneratorFailed {
                program: spec.program_name(),
                status,
            });
        }

        let metadata_path = config.output_path(&self.tools.metadata_file);
        let aliases = load_alias_map(&metadata_path)?;
        debug!(
            path = %metadata_path.display(),
            entries = aliases.len(),
            "Loaded package alias metadata"
        );
        Ok(aliases)
    }
}

/// Builds the generator argument list.
///
/// Order matters: the directory of the first definition file is the primary
/// search root, followed by the import roots in the order given, then every
/// definition file, then the two output directives.
pub fn generator_args(config: &PipelineConfig, tools: &ToolSettings) -> Vec<String> {
    let output = config.output_dir.display().to_string();
    let mut args = Vec::with_capacity(4 + 2 * config.imports.len() + config.proto_paths.len());

    if let Some(primary) = config.primary_proto() {
        args.push("-I".to_string());
        args.push(search_root(primary).display().to_string());
    }

    for import in &config.imports {
        args.push("-I".to_string());
        args.push(import.display().to_string());
    }

    args.extend(config.proto_paths.iter().map(|p| p.display().to_string()));

    args.push(format!("--{}_out=plugins=grpc:{output}", tools.stub_plugin));
    args.push(format!(
        "--{}_out=admin-port={},grpc-address={},grpc-port={}:{output}",
        tools.scaffold_plugin, config.admin_port, config.grpc_address, config.grpc_port
    ));
    args
}

/// Directory containing `proto`, or `.` for a bare file name.
fn search_root(proto: &Path) -> PathBuf {
    match proto.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
