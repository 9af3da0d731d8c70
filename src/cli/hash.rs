//! `rbuild hash`: print the dependency fingerprint.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::common::{BuildArgs, CommandExecutor};
use crate::constants::MAIN_SESSION;

/// Print the fingerprint `prepare` compares against `<deps_dir>/hash`.
#[derive(Args, Debug, Clone, Default)]
pub struct HashCommand {
    #[command(flatten)]
    pub args: BuildArgs,
}

impl CommandExecutor for HashCommand {
    async fn execute_in(self, project_dir: &Path) -> Result<()> {
        let builder = self.args.builder(project_dir, MAIN_SESSION, None)?;
        println!("{}", builder.compute_hash()?);
        Ok(())
    }
}
