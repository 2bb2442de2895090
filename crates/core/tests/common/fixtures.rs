//! Test fixtures for configurations and generator output.

use pm_protocol::config_models::{AdminOptions, PipelineConfig, DEFAULT_ADMIN_PORT, DEFAULT_GRPC_PORT};
use std::path::{Path, PathBuf};

/// Metadata written by the fake generator.
pub const ALIAS_JSON: &str = r#"{"a.proto": {"Alias":"svc1","GoPackage":"pkg1"}}"#;

/// Configuration rooted at `output_dir`, with one definition file.
pub fn test_config(output_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        proto_paths: vec![PathBuf::from("svc/a.proto")],
        admin_port: DEFAULT_ADMIN_PORT,
        grpc_address: String::new(),
        grpc_port: DEFAULT_GRPC_PORT,
        output_dir: PathBuf::from(format!("{}/", output_dir.display())),
        imports: vec![PathBuf::from("/protobuf")],
    }
}

pub fn test_admin_options() -> AdminOptions {
    AdminOptions {
        stub_path: String::new(),
        port: DEFAULT_ADMIN_PORT,
        bind_addr: String::new(),
    }
}

/// Location the fake generator writes metadata to.
pub fn metadata_path(config: &PipelineConfig) -> PathBuf {
    config.output_path("proto.json")
}
