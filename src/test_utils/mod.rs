//! Test utilities for rbuild
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration tests:
//!
//! - [`RecordingRunner`] - a [`ToolRunner`](crate::tools::ToolRunner) that
//!   records invocations and can be told to fail
//! - [`ProjectFixture`] - a temporary project directory
//! - [`init_test_logging`] - one-time tracing setup
//!
//! # Example
//!
//! ```rust,no_run
//! use rbuild::builder::Builder;
//! use rbuild::config::OptionLayer;
//! use rbuild::test_utils::{ProjectFixture, RecordingRunner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let project = ProjectFixture::new()?.with_requirements(&["acme/lib@1.0"])?;
//! let builder = Builder::new(project.path(), "try:main", OptionLayer::default(), RecordingRunner::new())?;
//! builder.prepare(true).await?;
//! assert!(builder.runner().operations().contains(&"install".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod runner;

pub use fixtures::ProjectFixture;
pub use runner::RecordingRunner;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; does nothing when neither is
/// set. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=rbuild=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true) // shows "tool", "config", "cache"
            .try_init();
    });
}
