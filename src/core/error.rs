//! Error handling for rbuild
//!
//! Two layers, following the usual split between code-facing and user-facing
//! errors:
//! 1. [`RbuildError`] - strongly typed failures raised by the configuration
//!    resolver, the requirement expander, the tool runner and the pipeline.
//! 2. [`ErrorContext`] - wraps an [`RbuildError`] with a suggestion and extra
//!    details for display on the terminal.
//!
//! Library functions return [`anyhow::Result`]. Typed failures are raised with
//! `RbuildError::X { .. }.into()` so callers (and tests) can recover the variant
//! with [`anyhow::Error::downcast_ref`]. [`user_friendly_error`] turns any
//! error into an [`ErrorContext`] for the CLI.
//!
//! # Error categories
//!
//! - **Configuration**: [`RbuildError::UnknownSession`], [`RbuildError::ConfigParse`],
//!   [`RbuildError::Interpolation`]
//! - **Requirements**: [`RbuildError::RequirementParse`], [`RbuildError::IncludeCycle`]
//! - **External tools**: [`RbuildError::ToolFailed`], [`RbuildError::ToolNotFound`],
//!   [`RbuildError::UnknownToolOption`]
//! - **File system**: [`RbuildError::FileSystemError`], [`RbuildError::IoError`]
//!
//! A dependency fingerprint mismatch is never an error; it is the normal
//! trigger for reinstalling dependencies.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rbuild::core::{RbuildError, user_friendly_error};
//!
//! let err: anyhow::Error = RbuildError::UnknownSession {
//!     session: "ci".to_string(),
//! }
//! .into();
//!
//! let ctx = user_friendly_error(err);
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Every failure rbuild can report.
#[derive(Error, Debug)]
pub enum RbuildError {
    /// The requested session has no section in the configuration source and
    /// was not requested with the `try:` prefix.
    #[error("Unknown session: {session}")]
    UnknownSession {
        /// Session name as requested (without any `try:` prefix)
        session: String,
    },

    /// The configuration source could not be parsed.
    #[error("Invalid configuration in {file} at line {line}: {reason}")]
    ConfigParse {
        /// Configuration file, or `<default>` for the built-in template
        file: String,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// A `${...}` reference could not be resolved.
    #[error("Bad interpolation of '{key}' in section [{section}]: {reason}")]
    Interpolation {
        /// Section being resolved
        section: String,
        /// Key whose value holds the bad reference
        key: String,
        /// Why resolution failed
        reason: String,
    },

    /// A requirement line could not be tokenized.
    #[error("Invalid requirement in {file} at line {line}: {reason}")]
    RequirementParse {
        /// File holding the requirement, or `<config>` for `deps` entries
        file: String,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// A `-f` include re-entered a file that is still being expanded.
    #[error("Requirement include cycle detected: {chain}")]
    IncludeCycle {
        /// Include chain, joined with ` -> `
        chain: String,
    },

    /// An external tool exited with a failure status.
    #[error("{tool} {operation} failed ({status})")]
    ToolFailed {
        /// Tool executable name (`cget`, `cmake`)
        tool: String,
        /// First operation argument, e.g. `install` or `--build`
        operation: String,
        /// Exit status description
        status: String,
    },

    /// An external tool could not be located or spawned.
    #[error("{tool} is not installed or not found in PATH")]
    ToolNotFound {
        /// Tool executable name
        tool: String,
    },

    /// An option name with no flag rule was handed to a tool argument builder.
    #[error("Unrecognized tool option: {option}")]
    UnknownToolOption {
        /// The rejected option name
        option: String,
    },

    /// A build or dependency directory could not be created or removed.
    #[error("File system error: {operation}")]
    FileSystemError {
        /// What was being attempted
        operation: String,
        /// Path involved
        path: String,
    },

    /// Raw I/O failure.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Anything else, already formatted.
    #[error("{message}")]
    Other {
        /// Message shown to the user
        message: String,
    },
}

impl RbuildError {
    /// Returns true for errors that come from the configuration source.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownSession { .. } | Self::ConfigParse { .. } | Self::Interpolation { .. }
        )
    }
}

/// An [`RbuildError`] together with hints for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: RbuildError,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Extra explanation, such as the context the error was raised under
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wraps an error with no suggestion or details.
    #[must_use]
    pub const fn new(error: RbuildError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Adds a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Adds details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);
        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }
        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Converts any error into an [`ErrorContext`] suitable for the terminal.
///
/// Typed [`RbuildError`]s anywhere in the chain get tailored suggestions;
/// everything else is shown with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let typed = error.chain().find_map(|cause| cause.downcast_ref::<RbuildError>());
    if let Some(rbuild_error) = typed {
        let ctx = create_error_context(rbuild_error);
        // Keep the outer context messages, they usually name the stage
        if error.to_string() != rbuild_error.to_string() && ctx.details.is_none() {
            return ctx.with_details(error.to_string());
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(RbuildError::FileSystemError {
                operation: "file access".to_string(),
                path: "unknown".to_string(),
            })
            .with_suggestion("Check the ownership and permissions of the build and deps directories");
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(RbuildError::Other {
        message,
    })
}

fn create_error_context(error: &RbuildError) -> ErrorContext {
    match error {
        RbuildError::UnknownSession { session } => {
            ErrorContext::new(RbuildError::UnknownSession {
                session: session.clone(),
            })
            .with_suggestion(format!(
                "Add a [{session}] section to rbuild.ini, or request 'try:{session}' to fall back to [default]"
            ))
        }
        RbuildError::ConfigParse { file, line, reason } => {
            ErrorContext::new(RbuildError::ConfigParse {
                file: file.clone(),
                line: *line,
                reason: reason.clone(),
            })
            .with_suggestion("Entries are 'key = value'; continuation lines must be indented")
        }
        RbuildError::Interpolation { section, key, reason } => {
            ErrorContext::new(RbuildError::Interpolation {
                section: section.clone(),
                key: key.clone(),
                reason: reason.clone(),
            })
            .with_suggestion("References look like ${key} or ${section:key}; write $$ for a literal $")
        }
        RbuildError::RequirementParse { file, line, reason } => {
            ErrorContext::new(RbuildError::RequirementParse {
                file: file.clone(),
                line: *line,
                reason: reason.clone(),
            })
            .with_suggestion("Check quoting in the requirement line; '-f' needs a file argument")
        }
        RbuildError::IncludeCycle { chain } => ErrorContext::new(RbuildError::IncludeCycle {
            chain: chain.clone(),
        })
        .with_suggestion("Remove one of the '-f' lines so the requirement files no longer include each other"),
        RbuildError::ToolFailed { tool, operation, status } => ErrorContext::new(RbuildError::ToolFailed {
            tool: tool.clone(),
            operation: operation.clone(),
            status: status.clone(),
        })
        .with_suggestion(match tool.as_str() {
            "cget" => "Re-run the same command; dependencies are reinstalled until one prepare succeeds",
            _ => "Inspect the build output above; run with --verbose to see every command",
        }),
        RbuildError::ToolNotFound { tool } => ErrorContext::new(RbuildError::ToolNotFound {
            tool: tool.clone(),
        })
        .with_suggestion(match tool.as_str() {
            t if t.contains("cget") => "Install cget with 'pip install cget', or point RBUILD_CGET at the executable",
            _ => "Install CMake from https://cmake.org/ or point RBUILD_CMAKE at the executable",
        }),
        RbuildError::UnknownToolOption { option } => {
            ErrorContext::new(RbuildError::UnknownToolOption {
                option: option.clone(),
            })
        }
        RbuildError::FileSystemError { operation, path } => {
            ErrorContext::new(RbuildError::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            })
            .with_details(format!("Path: {path}"))
            .with_suggestion("Check that the directory is writable and not in use by another rbuild run")
        }
        RbuildError::IoError(e) => ErrorContext::new(RbuildError::Other {
            message: format!("IO error: {e}"),
        }),
        RbuildError::Other { message } => ErrorContext::new(RbuildError::Other {
            message: message.clone(),
        }),
    }
}
