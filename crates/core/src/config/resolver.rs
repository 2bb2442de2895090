//! Resolution of raw command line input into a [`PipelineConfig`].

use crate::config::error::{ConfigError, ConfigResult};
use pm_protocol::config_models::{AdminOptions, PipelineConfig};
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tracing::debug;

/// Environment variable naming the source root used for the default output.
pub const SOURCE_ROOT_ENV: &str = "GOPATH";

/// Output directory below the source root when `-o` is not given.
const DEFAULT_OUTPUT_SUBDIR: &str = "src/grpc";

/// Raw flag values, exactly as the user supplied them.
#[derive(Debug, Clone, Default)]
pub struct RawParams {
    /// Output directory override. Empty or `None` means unset.
    pub output: Option<String>,

    /// Value of [`SOURCE_ROOT_ENV`], read by the caller.
    pub source_root: Option<String>,

    pub admin_port: u16,
    pub admin_address: String,
    pub grpc_port: u16,
    pub grpc_address: String,

    /// Optional directory with preloaded stubs.
    pub stub_path: String,

    /// Comma separated import search roots.
    pub imports: String,

    /// Positional definition file paths.
    pub proto_paths: Vec<PathBuf>,
}

/// Everything a run needs, produced once from [`RawParams`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParams {
    pub pipeline: PipelineConfig,
    pub admin: AdminOptions,
}

/// Resolves raw parameters into an immutable configuration.
///
/// The only side effect is creating the output directory when it does not
/// exist yet. Existing directories are left untouched.
///
/// # Errors
///
/// Returns `ConfigError` if no definition file is given, if neither an output
/// directory nor a source root is available, or if the output directory
/// cannot be created or written.
pub fn resolve(raw: RawParams) -> ConfigResult<ResolvedParams> {
    if raw.proto_paths.is_empty() {
        return Err(ConfigError::MissingProtoFiles);
    }

    let output_dir = resolve_output_dir(raw.output.as_deref(), raw.source_root.as_deref())?;
    ensure_output_dir(&output_dir)?;

    let imports = split_imports(&raw.imports);
    debug!(
        output_dir = %output_dir.display(),
        imports = ?imports,
        protos = raw.proto_paths.len(),
        "Resolved pipeline parameters"
    );

    Ok(ResolvedParams {
        pipeline: PipelineConfig {
            proto_paths: raw.proto_paths,
            admin_port: raw.admin_port,
            grpc_address: raw.grpc_address,
            grpc_port: raw.grpc_port,
            output_dir,
            imports,
        },
        admin: AdminOptions {
            stub_path: raw.stub_path,
            port: raw.admin_port,
            bind_addr: raw.admin_address,
        },
    })
}

/// Picks the output directory and normalizes it to end with a separator.
pub fn resolve_output_dir(output: Option<&str>, source_root: Option<&str>) -> ConfigResult<PathBuf> {
    let chosen = match (non_empty(output), non_empty(source_root)) {
        (Some(output), _) => PathBuf::from(output),
        (None, Some(root)) => Path::new(root).join(DEFAULT_OUTPUT_SUBDIR),
        (None, None) => {
            return Err(ConfigError::NoOutputRoot {
                env_var: SOURCE_ROOT_ENV,
            })
        }
    };

    let absolute = std::path::absolute(&chosen).map_err(|source| ConfigError::OutputDir {
        path: chosen.clone(),
        source,
    })?;

    Ok(with_trailing_separator(&absolute))
}

/// Splits the comma separated import option, keeping order and dropping
/// empty segments.
pub fn split_imports(imports: &str) -> Vec<PathBuf> {
    imports
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn ensure_output_dir(path: &Path) -> ConfigResult<()> {
    match fs::metadata(path) {
        Ok(meta) if !meta.is_dir() => {
            return Err(ConfigError::OutputNotWritable {
                path: path.to_path_buf(),
            })
        }
        Ok(meta) => {
            if meta.permissions().readonly() {
                return Err(ConfigError::OutputNotWritable {
                    path: path.to_path_buf(),
                });
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Creating output directory");
            fs::create_dir_all(path).map_err(|source| ConfigError::OutputDir {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Err(source) => {
            return Err(ConfigError::OutputDir {
                path: path.to_path_buf(),
                source,
            })
        }
    }
    Ok(())
}

fn with_trailing_separator(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let trimmed = raw.trim_end_matches(['/', MAIN_SEPARATOR]);
    PathBuf::from(format!("{trimmed}{MAIN_SEPARATOR}"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
