//! rbuild - build front end for cget/cmake projects
//!
//! rbuild turns a project directory into a configured, built tree in three
//! stages: install third-party dependencies into a prefix with `cget`,
//! configure the project with `cmake`, and build it.
//!
//! # Architecture Overview
//!
//! - Build options come from a session of `rbuild.ini` (or a built-in default),
//!   merged with command-line overrides into one immutable value
//! - The `deps` option is a requirement list with `-f <file>` includes,
//!   flattened and filtered against the `ignore` list
//! - The flattened list is fingerprinted; `prepare` reinstalls dependencies
//!   only when the fingerprint differs from the one stored in `<deps_dir>/hash`
//! - External tools are reached through an injectable runner, so the stage
//!   logic is tested without spawning processes
//!
//! # Core Modules
//!
//! - [`builder`] - the prepare/configure/build pipeline
//! - [`config`] - `rbuild.ini` parsing, sessions and the option merge
//! - [`requirements`] - requirement list expansion
//! - [`deps`] - dependency fingerprint and its on-disk record
//! - [`tools`] - `cget` and `cmake` invocations and the process runner
//!
//! ## Supporting Modules
//!
//! - [`cli`] - command-line interface
//! - [`core`] - error types and user-facing error rendering
//! - [`constants`] - file names, tool names and the default ignore list
//! - [`utils`] - file system and platform helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use rbuild::builder::Builder;
//! use rbuild::config::OptionLayer;
//! use rbuild::tools::ProcessRunner;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let builder = Builder::new(".", "try:main", OptionLayer::default(), ProcessRunner::new())?;
//! println!("fingerprint: {}", builder.compute_hash()?);
//! builder.prepare(true).await?;
//! # Ok(())
//! # }
//! ```

// Pipeline
pub mod builder;
pub mod config;
pub mod deps;
pub mod requirements;
pub mod tools;

// Supporting modules
pub mod cli;
pub mod constants;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
