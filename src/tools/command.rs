//! Fluent builder describing one external tool invocation.
//!
//! A [`ToolCommand`] is plain data: the executable, its arguments, the
//! working directory and a short operation name used in errors. Running it is
//! the job of a [`ToolRunner`](super::ToolRunner), which keeps the pipeline's
//! decisions testable without spawning processes.
//!
//! # Examples
//!
//! ```rust
//! use rbuild::tools::ToolCommand;
//!
//! let cmd = ToolCommand::new("cget", "cget", "clean").args(["-p", "deps", "clean", "-y"]);
//! assert_eq!(cmd.display_line(), "cget -p deps clean -y");
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

/// One external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Logical tool name (`cget`, `cmake`), used in errors
    tool: String,

    /// Executable actually spawned; differs from `tool` when overridden by environment
    program: String,

    /// Operation name for errors and logs (`install`, `configure`, ...)
    operation: String,

    args: Vec<String>,

    /// Working directory, `None` for the current process directory
    current_dir: Option<PathBuf>,
}

impl ToolCommand {
    /// Creates an invocation of `program` for the logical `tool`.
    pub fn new(tool: impl Into<String>, program: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            program: program.into(),
            operation: operation.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Appends a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments in order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Runs the tool inside `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// The command line as echoed before it runs: program and arguments
    /// joined by single spaces.
    #[must_use]
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_line())
    }
}
