//! Dependency tool (`cget`) invocations.
//!
//! Every operation targets one dependency prefix directory, passed as
//! `-p <prefix>`:
//!
//! ```text
//! cget -p <prefix> clean -y
//! cget -p <prefix> init [--define D]... [--cxx X] [--cc C] [--toolchain T]
//! cget -p <prefix> ignore <id>
//! cget -p <prefix> install <token>...
//! ```
//!
//! `init` flags are produced by the typed [`InitOption`] builder, which knows a
//! fixed set of option names and rejects anything else.

use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};

use super::ToolCommand;
use crate::config::BuildOptions;
use crate::constants::CGET;
use crate::core::RbuildError;
use crate::requirements::Requirement;
use crate::utils::platform::tool_command;

/// Environment variable overriding the `cget` executable.
pub const CGET_ENV: &str = "RBUILD_CGET";

/// One recognized `cget init` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOption {
    /// `--define NAME=VALUE`
    Define(String),
    /// `--cxx <compiler>`
    Cxx(String),
    /// `--cc <compiler>`
    Cc(String),
    /// `--toolchain <file>`
    Toolchain(String),
}

impl InitOption {
    /// Builds the option for `key`, rejecting names with no flag rule.
    pub fn from_key(key: &str, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        match key {
            "define" | "global_define" => Ok(Self::Define(value)),
            "cxx" => Ok(Self::Cxx(value)),
            "cc" => Ok(Self::Cc(value)),
            "toolchain" => Ok(Self::Toolchain(value)),
            other => Err(RbuildError::UnknownToolOption {
                option: other.to_string(),
            }
            .into()),
        }
    }

    #[must_use]
    pub const fn flag(&self) -> &'static str {
        match self {
            Self::Define(_) => "--define",
            Self::Cxx(_) => "--cxx",
            Self::Cc(_) => "--cc",
            Self::Toolchain(_) => "--toolchain",
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Define(v) | Self::Cxx(v) | Self::Cc(v) | Self::Toolchain(v) => v,
        }
    }

    /// Flag and value as two separate arguments.
    #[must_use]
    pub fn to_args(&self) -> [String; 2] {
        [self.flag().to_string(), self.value().to_string()]
    }
}

impl fmt::Display for InitOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.flag(), self.value())
    }
}

/// The `init` options implied by `options`.
///
/// Defines (global ones first) are included only when `with_defines` is set;
/// compiler and toolchain overrides are always included when present.
pub fn init_options(options: &BuildOptions, with_defines: bool) -> Result<Vec<InitOption>> {
    let mut pairs: Vec<(&str, &str)> = Vec::new();
    if with_defines {
        pairs.extend(options.global_define().iter().map(|d| ("global_define", d.as_str())));
        pairs.extend(options.define().iter().map(|d| ("define", d.as_str())));
    }
    for (key, value) in [("cxx", options.cxx()), ("cc", options.cc()), ("toolchain", options.toolchain())] {
        if let Some(value) = value {
            pairs.push((key, value));
        }
    }
    pairs.into_iter().map(|(key, value)| InitOption::from_key(key, value)).collect()
}

/// Builds `cget` invocations for one dependency prefix.
#[derive(Debug, Clone)]
pub struct Cget {
    program: String,
    prefix: PathBuf,
}

impl Cget {
    /// Uses the executable named by `RBUILD_CGET`, or `cget`.
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self::with_program(tool_command(CGET, CGET_ENV), prefix)
    }

    pub fn with_program(program: impl Into<String>, prefix: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    fn command(&self, operation: &str) -> ToolCommand {
        ToolCommand::new(CGET, self.program.as_str(), operation)
            .arg("-p")
            .arg(self.prefix.display().to_string())
            .arg(operation)
    }

    /// `clean -y`: wipes the prefix without prompting.
    #[must_use]
    pub fn clean(&self) -> ToolCommand {
        self.command("clean").arg("-y")
    }

    #[must_use]
    pub fn init(&self, options: &[InitOption]) -> ToolCommand {
        options.iter().fold(self.command("init"), |cmd, opt| cmd.args(opt.to_args()))
    }

    #[must_use]
    pub fn ignore(&self, id: &str) -> ToolCommand {
        self.command("ignore").arg(id)
    }

    /// `install` for one requirement, run from `source_dir` so relative
    /// requirement paths resolve against the project.
    #[must_use]
    pub fn install(&self, requirement: &Requirement, source_dir: &Path) -> ToolCommand {
        self.command("install").args(requirement.tokens().iter().cloned()).current_dir(source_dir)
    }
}
