//! External tool collaborators.
//!
//! - [`command`] - the [`ToolCommand`] invocation builder
//! - [`runner`] - the [`ToolRunner`] trait and the process-spawning [`ProcessRunner`]
//! - [`cget`] - dependency tool invocations and the typed `init` flag builder
//! - [`cmake`] - configure and build invocations

pub mod cget;
pub mod cmake;
pub mod command;
pub mod runner;

pub use cget::{Cget, InitOption, init_options};
pub use cmake::{Cmake, parallel_jobs, toolchain_file};
pub use command::ToolCommand;
pub use runner::{ProcessRunner, ToolRunner};
