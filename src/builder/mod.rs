//! The build pipeline.
//!
//! [`Builder`] owns the resolved [`BuildOptions`] and drives three stages,
//! each independently callable:
//!
//! 1. [`prepare`](Builder::prepare) - install dependencies into the prefix,
//!    skipped entirely when the dependency fingerprint is unchanged
//! 2. [`configure`](Builder::configure) - (re)create the build directory and
//!    run the build tool's configure step
//! 3. [`build`](Builder::build) - build one target
//!
//! All external work goes through the injected [`ToolRunner`]. Calls are
//! awaited one at a time and the first failure aborts the stage. Nothing is
//! carried between stages except what is on disk: the fingerprint record and
//! the dependency and build directories.
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
//! builder.prepare(true).await?;
//! builder.configure(true).await?;
//! builder.build(None).await?;
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::{BuildOptions, OptionLayer, resolve_options};
use crate::constants::DEFAULT_TARGET;
use crate::deps::{DependencyCache, requirements_hash};
use crate::requirements::{Requirement, expand};
use crate::tools::{Cget, Cmake, ProcessRunner, ToolRunner, init_options, parallel_jobs};
use crate::utils::fs::{ensure_dir, remove_dir_all};

/// What [`Builder::prepare`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// The stored fingerprint matched; no tool was run.
    UpToDate,
    /// Dependencies were reinstalled; holds the number of requirements installed.
    Installed(usize),
}

/// Orchestrates the prepare, configure and build stages for one project.
#[derive(Debug)]
pub struct Builder<R: ToolRunner = ProcessRunner> {
    project_dir: PathBuf,
    options: BuildOptions,
    runner: R,
    cget: Cget,
    cmake: Cmake,
}

impl<R: ToolRunner> Builder<R> {
    /// Resolves `session` in the project at `project_dir`, applying `overrides`.
    pub fn new(project_dir: impl Into<PathBuf>, session: &str, overrides: OptionLayer, runner: R) -> Result<Self> {
        let project_dir = project_dir.into();
        let options = resolve_options(&project_dir, session, overrides)?;
        Ok(Self::from_options(project_dir, options, runner))
    }

    /// Wraps already-resolved options.
    pub fn from_options(project_dir: impl Into<PathBuf>, options: BuildOptions, runner: R) -> Self {
        let cget = Cget::new(options.deps_dir());
        Self {
            project_dir: project_dir.into(),
            options,
            runner,
            cget,
            cmake: Cmake::new(),
        }
    }

    /// Replaces the tool invocation builders, e.g. to pin executable names.
    #[must_use]
    pub fn with_tools(mut self, cget: Cget, cmake: Cmake) -> Self {
        self.cget = cget;
        self.cmake = cmake;
        self
    }

    #[must_use]
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The expanded, filtered requirement list.
    pub fn requirements(&self) -> Result<Vec<Requirement>> {
        expand(self.options.deps(), &self.project_dir, self.options.ignore())
    }

    /// Fingerprint of the current requirement list.
    pub fn compute_hash(&self) -> Result<String> {
        Ok(requirements_hash(&self.requirements()?))
    }

    /// Installs dependencies unless the stored fingerprint is current.
    ///
    /// The fingerprint record is written only after every install succeeded,
    /// so a failed run is retried in full next time.
    pub async fn prepare(&self, init_with_define: bool) -> Result<PrepareOutcome> {
        let deps_dir = self.options.deps_dir();
        let requirements = self.requirements()?;
        let hash = requirements_hash(&requirements);
        let cache = DependencyCache::new(deps_dir);

        if cache.matches(&hash)? {
            tracing::info!("Dependencies in {} are up to date", deps_dir.display());
            return Ok(PrepareOutcome::UpToDate);
        }

        tracing::info!("Preparing {} dependencies in {}", requirements.len(), deps_dir.display());
        let init = init_options(&self.options, init_with_define)?;

        self.runner.run(&self.cget.clean()).await?;
        ensure_dir(deps_dir)?;
        self.runner.run(&self.cget.init(&init)).await?;
        for id in self.options.ignore() {
            self.runner.run(&self.cget.ignore(id)).await?;
        }
        for requirement in &requirements {
            tracing::debug!("Installing {}", requirement);
            self.runner.run(&self.cget.install(requirement, self.options.source_dir())).await?;
        }

        cache.store(&hash)?;
        Ok(PrepareOutcome::Installed(requirements.len()))
    }

    /// Runs the configure step, wiping the build directory first when `clean`.
    pub async fn configure(&self, clean: bool) -> Result<()> {
        let build_dir = self.options.build_dir();
        if clean {
            tracing::debug!("Removing build directory {}", build_dir.display());
            remove_dir_all(build_dir)?;
        }
        ensure_dir(build_dir)?;

        tracing::info!("Configuring {} in {}", self.options.source_dir().display(), build_dir.display());
        let cmd = self.cmake.configure(
            self.options.deps_dir(),
            self.options.source_dir(),
            build_dir,
            self.options.define(),
        );
        self.runner.run(&cmd).await
    }

    /// Builds `target`, or the default target when `None`.
    pub async fn build(&self, target: Option<&str>) -> Result<()> {
        let build_dir = self.options.build_dir();
        let jobs = parallel_jobs(build_dir);
        tracing::info!("Building {} in {}", target.unwrap_or(DEFAULT_TARGET), build_dir.display());
        self.runner.run(&self.cmake.build(build_dir, target, jobs)).await
    }

    /// Builds each target in order, stopping at the first failure.
    ///
    /// An empty list builds the default target once.
    pub async fn build_targets(&self, targets: &[String]) -> Result<()> {
        if targets.is_empty() {
            return self.build(None).await;
        }
        for target in targets {
            self.build(Some(target)).await?;
        }
        Ok(())
    }
}
