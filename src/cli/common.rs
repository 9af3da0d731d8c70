//! Arguments and execution pattern shared by every pipeline command.

use anyhow::{Context, Result};
use clap::Args;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::builder::Builder;
use crate::config::OptionLayer;
use crate::tools::ProcessRunner;
use crate::utils::fs::actual_path;

/// Common trait for CLI command execution pattern
pub trait CommandExecutor: Sized {
    /// Execute the command with the current directory as the project directory
    fn execute(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Send,
    {
        async move {
            let project_dir = std::env::current_dir().context("Failed to determine the current directory")?;
            self.execute_in(&project_dir).await
        }
    }

    /// Execute the command for the project rooted at `project_dir`
    fn execute_in(self, project_dir: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Option overrides accepted by every pipeline command.
///
/// Each flag given replaces the value from `rbuild.ini`; flags left out keep
/// it. Relative directories are resolved against the project directory.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Dependency prefix directory
    #[arg(short = 'd', long, value_name = "DIR")]
    pub deps_dir: Option<PathBuf>,

    /// Project source directory
    #[arg(short = 'S', long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Build directory
    #[arg(short = 'B', long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// C++ compiler passed to the dependency tool
    #[arg(long, value_name = "COMPILER")]
    pub cxx: Option<String>,

    /// C compiler passed to the dependency tool
    #[arg(long, value_name = "COMPILER")]
    pub cc: Option<String>,

    /// Configuration session: `default`, `try:<name>` or `<name>`
    #[arg(short = 's', long)]
    pub session: Option<String>,

    /// Build variable for the configure step (repeatable)
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE")]
    pub defines: Vec<String>,
}

fn resolve_dir(dir: Option<&PathBuf>, project_dir: &Path) -> Result<Option<PathBuf>> {
    dir.map(|d| actual_path(&d.to_string_lossy(), Some(project_dir))).transpose()
}

impl BuildArgs {
    /// The session to resolve: `--session` when given, else `default_session`.
    #[must_use]
    pub fn session_or<'a>(&'a self, default_session: &'a str) -> &'a str {
        self.session.as_deref().filter(|s| !s.is_empty()).unwrap_or(default_session)
    }

    /// Overrides layer built from the flags.
    pub fn overrides(&self, project_dir: &Path, toolchain: Option<&str>) -> Result<OptionLayer> {
        Ok(OptionLayer {
            deps_dir: resolve_dir(self.deps_dir.as_ref(), project_dir)?,
            source_dir: resolve_dir(self.source_dir.as_ref(), project_dir)?,
            build_dir: resolve_dir(self.build_dir.as_ref(), project_dir)?,
            define: (!self.defines.is_empty()).then(|| self.defines.clone()),
            cxx: self.cxx.clone(),
            cc: self.cc.clone(),
            toolchain: toolchain.map(str::to_string),
            ..OptionLayer::default()
        })
    }

    /// A process-spawning [`Builder`] for `project_dir`.
    pub fn builder(
        &self,
        project_dir: &Path,
        default_session: &str,
        toolchain: Option<&str>,
    ) -> Result<Builder<ProcessRunner>> {
        let session = self.session_or(default_session);
        tracing::debug!("Using session '{}' in {}", session, project_dir.display());
        Builder::new(project_dir, session, self.overrides(project_dir, toolchain)?, ProcessRunner::new())
    }
}
