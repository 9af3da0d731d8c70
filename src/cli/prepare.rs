//! `rbuild prepare`: install the project's dependencies.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::common::{BuildArgs, CommandExecutor};
use crate::builder::PrepareOutcome;
use crate::constants::MAIN_SESSION;

/// Install dependencies into the prefix unless they are already up to date.
#[derive(Args, Debug, Clone, Default)]
pub struct PrepareCommand {
    #[command(flatten)]
    pub args: BuildArgs,

    /// CMake toolchain file passed to the dependency tool
    #[arg(short = 't', long, value_name = "FILE")]
    pub toolchain: Option<String>,
}

impl CommandExecutor for PrepareCommand {
    async fn execute_in(self, project_dir: &Path) -> Result<()> {
        let builder = self.args.builder(project_dir, MAIN_SESSION, self.toolchain.as_deref())?;
        if let PrepareOutcome::Installed(count) = builder.prepare(true).await? {
            tracing::info!("Installed {} dependencies", count);
        }
        Ok(())
    }
}
