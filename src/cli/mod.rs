//! Command-line interface for rbuild.
//!
//! Every command works on the project in the current directory: its
//! `rbuild.ini` (or the built-in default configuration), its requirement files
//! and the `deps/` and `build/` directories unless overridden.
//!
//! # Available Commands
//!
//! - `prepare` - install dependencies (session `try:main`)
//! - `build` - prepare, configure from scratch, build targets (session `try:main`)
//! - `package` - prepare, configure from scratch, build `package` (session `try:main`)
//! - `develop` - prepare and configure incrementally (session `try:develop`)
//! - `hash` - print the dependency fingerprint
//!
//! `--session` always replaces the command's default session.
//!
//! # Example
//!
//! ```bash
//! rbuild prepare
//! rbuild build -t MIOpen -t test_conv
//! rbuild develop -d ../deps --cxx /opt/rocm/llvm/bin/clang++
//! rbuild -v hash -s ci
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - debug logging
//! - `--quiet` - warnings and errors only
//!
//! `RUST_LOG` overrides both.

mod build;
pub mod common;
mod develop;
mod hash;
mod package;
mod prepare;


use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub use common::{BuildArgs, CommandExecutor};

/// Main CLI structure for rbuild.
#[derive(Parser, Debug)]
#[command(
    name = "rbuild",
    about = "Build front end for cget/cmake projects",
    version,
    long_about = "rbuild resolves per-session build options from rbuild.ini, installs \
                  dependencies with cget only when the requirement list changed, and \
                  drives cmake's configure and build steps."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install dependencies into the prefix unless they are up to date
    Prepare(prepare::PrepareCommand),

    /// Prepare, configure from scratch and build the given targets
    Build(build::BuildCommand),

    /// Prepare, configure from scratch and build the package target
    Package(package::PackageCommand),

    /// Prepare and configure an incremental development build
    Develop(develop::DevelopCommand),

    /// Print the dependency fingerprint
    Hash(hash::HashCommand),
}

impl Cli {
    /// Filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "rbuild=debug"
        } else if self.quiet {
            "warn"
        } else {
            "rbuild=info"
        }
    }

    /// Initializes logging and runs the selected command in the current directory.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.log_directive());

        match self.command {
            Commands::Prepare(cmd) => cmd.execute().await,
            Commands::Build(cmd) => cmd.execute().await,
            Commands::Package(cmd) => cmd.execute().await,
            Commands::Develop(cmd) => cmd.execute().await,
            Commands::Hash(cmd) => cmd.execute().await,
        }
    }
}

/// Installs the stderr tracing subscriber. `RUST_LOG` wins over `default_directive`.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
