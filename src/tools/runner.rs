//! Running [`ToolCommand`]s.
//!
//! [`ToolRunner`] is the seam between the pipeline and the outside world. The
//! production [`ProcessRunner`] spawns the tool with `tokio::process`, echoes
//! the command line to stdout first and lets the tool write straight to the
//! terminal. Tests substitute a recording runner.
//!
//! No timeout is applied: a tool that never exits stalls the pipeline.

use anyhow::{Context, Result};
use std::future::Future;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use super::ToolCommand;
use crate::core::RbuildError;
use crate::utils::platform::command_exists;

/// Executes external tool invocations on behalf of the pipeline.
///
/// Implementations must complete the invocation before the returned future
/// resolves and report any failure status as an error.
pub trait ToolRunner {
    /// Runs `command` to completion.
    fn run(&self, command: &ToolCommand) -> impl Future<Output = Result<()>> + Send;
}

/// Spawns real processes with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl ToolRunner for ProcessRunner {
    async fn run(&self, command: &ToolCommand) -> Result<()> {
        if !command_exists(command.program()) {
            return Err(RbuildError::ToolNotFound {
                tool: command.program().to_string(),
            }
            .into());
        }

        let line = command.display_line();
        println!("{line}");

        let mut cmd = Command::new(command.program());
        cmd.args(command.arguments());
        if let Some(dir) = command.working_dir() {
            tracing::debug!(target: "tool", "Executing in {}: {}", dir.display(), line);
            cmd.current_dir(dir);
        } else {
            tracing::debug!(target: "tool", "Executing: {}", line);
        }
        cmd.stdin(Stdio::inherit()).stdout(Stdio::inherit()).stderr(Stdio::inherit());

        let status = match cmd.status().await {
            Ok(status) => status,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RbuildError::ToolNotFound {
                    tool: command.program().to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to execute {line}"));
            }
        };

        if !status.success() {
            tracing::debug!(target: "tool", "Command failed with exit code: {:?}", status.code());
            return Err(RbuildError::ToolFailed {
                tool: command.tool().to_string(),
                operation: command.operation().to_string(),
                status: describe_status(status),
            }
            .into());
        }

        tracing::trace!(target: "tool", "{} {} completed", command.tool(), command.operation());
        Ok(())
    }
}
