//! `rbuild build`: the full pipeline.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::common::{BuildArgs, CommandExecutor};
use crate::constants::MAIN_SESSION;

/// Prepare dependencies, configure from scratch and build.
///
/// On this command `-t` selects a target; the toolchain is only available
/// as `--toolchain`.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildCommand {
    #[command(flatten)]
    pub args: BuildArgs,

    /// Target to build (repeatable, built in order; default: all)
    #[arg(short = 't', long = "target", value_name = "TARGET")]
    pub targets: Vec<String>,

    /// CMake toolchain file passed to the dependency tool
    #[arg(long, value_name = "FILE")]
    pub toolchain: Option<String>,
}

impl CommandExecutor for BuildCommand {
    async fn execute_in(self, project_dir: &Path) -> Result<()> {
        let builder = self.args.builder(project_dir, MAIN_SESSION, self.toolchain.as_deref())?;
        builder.prepare(false).await?;
        builder.configure(true).await?;
        builder.build_targets(&self.targets).await
    }
}
