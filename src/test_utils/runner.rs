//! A [`ToolRunner`] that records invocations instead of spawning processes.

use anyhow::Result;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::RbuildError;
use crate::tools::{ToolCommand, ToolRunner};

#[derive(Debug, Clone)]
struct FailureRule {
    operation: String,
    arg: Option<String>,
}

impl FailureRule {
    fn matches(&self, command: &ToolCommand) -> bool {
        command.operation() == self.operation
            && self.arg.as_ref().is_none_or(|arg| command.arguments().iter().any(|a| a == arg))
    }
}

/// Records every command it is asked to run, in order.
///
/// Commands matching a failure rule are recorded and then fail with
/// [`RbuildError::ToolFailed`], as a real tool exiting with status 1 would.
///
/// ```rust
/// use rbuild::test_utils::RecordingRunner;
///
/// let runner = RecordingRunner::new().fail_on_arg("install", "acme/broken@1.0");
/// assert!(runner.calls().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<ToolCommand>>,
    failures: Mutex<Vec<FailureRule>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RecordingRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every command whose operation is `operation`.
    #[must_use]
    pub fn fail_on(self, operation: &str) -> Self {
        lock(&self.failures).push(FailureRule {
            operation: operation.to_string(),
            arg: None,
        });
        self
    }

    /// Fails commands for `operation` that carry `arg` among their arguments.
    #[must_use]
    pub fn fail_on_arg(self, operation: &str, arg: &str) -> Self {
        lock(&self.failures).push(FailureRule {
            operation: operation.to_string(),
            arg: Some(arg.to_string()),
        });
        self
    }

    /// Removes all failure rules.
    pub fn succeed_always(&self) {
        lock(&self.failures).clear();
    }

    /// Every recorded command, oldest first.
    pub fn calls(&self) -> Vec<ToolCommand> {
        lock(&self.calls).clone()
    }

    /// Recorded command lines as they would have been echoed.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.calls).iter().map(ToolCommand::display_line).collect()
    }

    /// Recorded operation names (`clean`, `init`, `install`, ...).
    pub fn operations(&self) -> Vec<String> {
        lock(&self.calls).iter().map(|c| c.operation().to_string()).collect()
    }

    /// Forgets recorded commands, keeping failure rules.
    pub fn clear(&self) {
        lock(&self.calls).clear();
    }
}

impl ToolRunner for RecordingRunner {
    async fn run(&self, command: &ToolCommand) -> Result<()> {
        lock(&self.calls).push(command.clone());

        let fails = lock(&self.failures).iter().any(|rule| rule.matches(command));
        if fails {
            return Err(RbuildError::ToolFailed {
                tool: command.tool().to_string(),
                operation: command.operation().to_string(),
                status: "exit code 1".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
