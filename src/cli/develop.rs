//! `rbuild develop`: set up an incremental development build directory.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::common::{BuildArgs, CommandExecutor};
use crate::constants::DEVELOP_SESSION;

/// Prepare dependencies and configure without wiping the build directory.
#[derive(Args, Debug, Clone, Default)]
pub struct DevelopCommand {
    #[command(flatten)]
    pub args: BuildArgs,

    /// CMake toolchain file passed to the dependency tool
    #[arg(short = 't', long, value_name = "FILE")]
    pub toolchain: Option<String>,
}

impl CommandExecutor for DevelopCommand {
    async fn execute_in(self, project_dir: &Path) -> Result<()> {
        let builder = self.args.builder(project_dir, DEVELOP_SESSION, self.toolchain.as_deref())?;
        builder.prepare(false).await?;
        builder.configure(false).await
    }
}
