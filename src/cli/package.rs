//! `rbuild package`: prepare, configure from scratch and build the `package` target.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::common::{BuildArgs, CommandExecutor};
use crate::constants::MAIN_SESSION;

/// Target built by `rbuild package`.
const PACKAGE_TARGET: &str = "package";

/// Produce distributable packages.
#[derive(Args, Debug, Clone, Default)]
pub struct PackageCommand {
    #[command(flatten)]
    pub args: BuildArgs,

    /// CMake toolchain file passed to the dependency tool
    #[arg(short = 't', long, value_name = "FILE")]
    pub toolchain: Option<String>,
}

impl CommandExecutor for PackageCommand {
    async fn execute_in(self, project_dir: &Path) -> Result<()> {
        let builder = self.args.builder(project_dir, MAIN_SESSION, self.toolchain.as_deref())?;
        builder.prepare(false).await?;
        builder.configure(true).await?;
        builder.build(Some(PACKAGE_TARGET)).await
    }
}
