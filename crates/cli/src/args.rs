//! Command line arguments.

use clap::Parser;
use pm_core::config::RawParams;
use pm_protocol::config_models::{DEFAULT_ADMIN_PORT, DEFAULT_GRPC_PORT, DEFAULT_IMPORTS};
use std::ffi::OsString;
use std::path::PathBuf;

/// Name of the binary, accepted once more as a leading argument.
pub const PROGRAM_NAME: &str = "protomock";

/// Generate, build and run a mock gRPC server from protobuf definitions.
#[derive(Parser, Debug)]
#[command(name = PROGRAM_NAME, version, about)]
pub struct Cli {
    /// Directory to output generated sources and the server. Default is $GOPATH/src/grpc/
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Port of the gRPC tcp server
    #[arg(long, default_value_t = DEFAULT_GRPC_PORT)]
    pub grpc_port: u16,

    /// Address the gRPC server will bind to. Defaults to localhost; use 0.0.0.0 to reach it from another machine
    #[arg(long = "grpc-listen", default_value = "")]
    pub grpc_listen: String,

    /// Port of the stub admin server
    #[arg(long, default_value_t = DEFAULT_ADMIN_PORT)]
    pub admin_port: u16,

    /// Address the admin server will bind to. Defaults to localhost; use 0.0.0.0 to reach it from another machine
    #[arg(long = "admin-listen", default_value = "")]
    pub admin_listen: String,

    /// Path where the stub files are (optional)
    #[arg(long, default_value = "")]
    pub stub: String,

    /// Comma separated import paths
    #[arg(long, default_value = DEFAULT_IMPORTS)]
    pub imports: String,

    /// Executable of the admin service. When unset it is expected to run elsewhere
    #[arg(long)]
    pub admin_bin: Option<PathBuf>,

    /// TOML file overriding the generator, compiler and file names
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Protocol buffer definition files
    #[arg(value_name = "PROTO")]
    pub protos: Vec<PathBuf>,
}

impl Cli {
    /// Convert into resolver input. `source_root` is the value of `$GOPATH`.
    pub fn raw_params(&self, source_root: Option<String>) -> RawParams {
        RawParams {
            output: self.output.clone(),
            source_root,
            admin_port: self.admin_port,
            admin_address: self.admin_listen.clone(),
            grpc_port: self.grpc_port,
            grpc_address: self.grpc_listen.clone(),
            stub_path: self.stub.clone(),
            imports: self.imports.clone(),
            proto_paths: self.protos.clone(),
        }
    }
}

/// Drop a repeated program name, so `protomock protomock a.proto` still works.
pub fn strip_program_alias<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().collect();
    if args.get(1).is_some_and(|arg| arg == PROGRAM_NAME) {
        args.remove(1);
    }
    args
}
