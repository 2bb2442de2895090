//! Common test utilities for pipeline tests.
//!
//! This module provides shared functionality across the integration tests:
//! - A fake command runner that never spawns real processes
//! - Fixtures (configurations, metadata files)
//! - Event assertions

pub mod assertions;
pub mod fake_runner;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
pub use fake_runner::*;
#[allow(unused_imports)]
pub use fixtures::*;
