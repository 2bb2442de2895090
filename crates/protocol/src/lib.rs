//! # pm-protocol
//!
//! Shared data models for protomock.
//!
//! This crate defines the plain data structures passed between the pipeline
//! stages and the CLI:
//! - Resolved pipeline configuration
//! - The package alias metadata written by the code generator
//! - Runtime state of the supervised mock server
//! - Progress events emitted while a run is in flight
//!
//! ## Modules
//!
//! - [`config_models`]: Immutable pipeline configuration and admin options
//! - [`metadata_models`]: Package alias map read from the generator output
//! - [`process_models`]: Supervisor state machine and command exit status
//! - [`events`]: Progress events reported by the pipeline engine
//!
//! This crate has no dependency on the other protomock crates.

pub mod config_models;
pub mod events;
pub mod metadata_models;
pub mod process_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use events::*;
pub use metadata_models::*;
pub use process_models::*;
