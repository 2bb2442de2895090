//! External tool settings.
//!
//! The pipeline drives three external programs: the source generator, the
//! compiler, and the compiled server. Their names and the file names they
//! exchange default to a protoc + Go toolchain and can be overridden with a
//! TOML file:
//!
//! ```toml
//! generator = "/usr/local/bin/protoc"
//! compiler = "go"
//! scaffold-plugin = "gripmock"
//! ```

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Names of the external programs and the files they exchange.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ToolSettings {
    /// Source generator executable.
    pub generator: String,

    /// Plugin that emits the standard RPC stubs (`--<name>_out`).
    pub stub_plugin: String,

    /// Plugin that emits the mock server scaffold (`--<name>_out`).
    pub scaffold_plugin: String,

    /// Compiler executable.
    pub compiler: String,

    /// Entry point source file inside the output directory.
    pub entry_point: String,

    /// Name of the compiled server inside the output directory.
    pub artifact: String,

    /// Package alias metadata file written by the scaffold plugin.
    pub metadata_file: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            generator: "protoc".to_string(),
            stub_plugin: "go".to_string(),
            scaffold_plugin: "gripmock".to_string(),
            compiler: "go".to_string(),
            entry_point: "server.go".to_string(),
            artifact: "grpcserver".to_string(),
            metadata_file: "proto.json".to_string(),
        }
    }
}

impl ToolSettings {
    fn validate(&self, path: &Path) -> ConfigResult<()> {
        let fields = [
            ("generator", &self.generator),
            ("stub-plugin", &self.stub_plugin),
            ("scaffold-plugin", &self.scaffold_plugin),
            ("compiler", &self.compiler),
            ("entry-point", &self.entry_point),
            ("artifact", &self.artifact),
            ("metadata-file", &self.metadata_file),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidConfig {
                    path: path.to_path_buf(),
                    reason: format!("`{name}` must not be empty"),
                });
            }
        }
        Ok(())
    }
}

/// Loads tool settings, falling back to defaults when no file is given.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, is not valid TOML,
/// contains unknown keys, or sets a value to an empty string.
pub fn load_tool_settings(path: Option<&Path>) -> ConfigResult<ToolSettings> {
    let Some(path) = path else {
        return Ok(ToolSettings::default());
    };

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let settings: ToolSettings =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?;

    settings.validate(path)?;
    Ok(settings)
}
