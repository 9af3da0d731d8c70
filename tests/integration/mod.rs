//! Integration test suite for rbuild
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **pipeline**: prepare/configure/build through the library with a recording runner
//! - **config_resolution**: `rbuild.ini` sessions, interpolation and overrides
//! - **cli**: the `rbuild` binary with stand-in tool executables

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod config_resolution;
mod pipeline;
