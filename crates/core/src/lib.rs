//! # pm-core
//!
//! Generate, build and run pipeline for protomock.
//!
//! This crate provides:
//! - Resolution of command line input into an immutable configuration
//! - A uniform way to run external programs, replaceable in tests
//! - Source generation from protocol buffer definitions
//! - Compilation of the generated mock server
//! - Supervision of the running server until it exits or is told to stop
//!
//! ## Modules
//!
//! - [`config`]: Parameter resolution and tool settings
//! - [`runner`]: External command execution
//! - [`generator`]: Source generation and package alias metadata
//! - [`builder`]: Compilation of the mock server
//! - [`supervisor`]: Lifecycle of the running server
//! - [`admin`]: Hand-off to the admin service
//! - [`engine`]: Sequencing of a full run

pub mod admin;
pub mod builder;
pub mod config;
pub mod engine;
pub mod generator;
pub mod runner;
pub mod supervisor;
