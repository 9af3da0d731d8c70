//! Build tool (`cmake`) invocations.
//!
//! ```text
//! cmake -DCMAKE_TOOLCHAIN_FILE=<deps>/cget/cget.cmake <source> -D<define>...   (cwd = build dir)
//! cmake --build <build> --config Release [--target T] [-- -j N]
//! ```
//!
//! CMake wants forward slashes in paths on every host, so configure
//! arguments are rewritten with [`to_forward_slashes`].

use std::path::{Path, PathBuf};

use super::ToolCommand;
use crate::constants::{BUILD_CONFIG, CMAKE, DEFAULT_TARGET, MAKEFILE_MARKER};
use crate::utils::platform::{available_cores, to_forward_slashes, tool_command};

/// Environment variable overriding the `cmake` executable.
pub const CMAKE_ENV: &str = "RBUILD_CMAKE";

/// Toolchain file the dependency tool writes into its prefix.
#[must_use]
pub fn toolchain_file(deps_dir: &Path) -> PathBuf {
    deps_dir.join("cget").join("cget.cmake")
}

/// Job count for `-j`, or `None` when the build directory was not generated
/// for a direct build-script (Makefile) generator.
#[must_use]
pub fn parallel_jobs(build_dir: &Path) -> Option<usize> {
    build_dir.join(MAKEFILE_MARKER).exists().then(available_cores)
}

#[derive(Debug, Clone)]
pub struct Cmake {
    program: String,
}

impl Default for Cmake {
    fn default() -> Self {
        Self::new()
    }
}

impl Cmake {
    /// Uses the executable named by `RBUILD_CMAKE`, or `cmake`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program(tool_command(CMAKE, CMAKE_ENV))
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Configure step, run from `build_dir`.
    #[must_use]
    pub fn configure(&self, deps_dir: &Path, source_dir: &Path, build_dir: &Path, defines: &[String]) -> ToolCommand {
        let mut args = vec![
            format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain_file(deps_dir).display()),
            source_dir.display().to_string(),
        ];
        args.extend(defines.iter().map(|d| format!("-D{d}")));

        ToolCommand::new(CMAKE, self.program.as_str(), "configure")
            .args(args.iter().map(|a| to_forward_slashes(a)))
            .current_dir(build_dir)
    }

    /// Build step. `target` of `None` or `all` builds the default target.
    #[must_use]
    pub fn build(&self, build_dir: &Path, target: Option<&str>, jobs: Option<usize>) -> ToolCommand {
        let mut cmd = ToolCommand::new(CMAKE, self.program.as_str(), "build")
            .arg("--build")
            .arg(build_dir.display().to_string())
            .args(["--config", BUILD_CONFIG]);

        if let Some(target) = target.filter(|t| *t != DEFAULT_TARGET) {
            cmd = cmd.args(["--target", target]);
        }
        if let Some(jobs) = jobs {
            cmd = cmd.args(["--".to_string(), "-j".to_string(), jobs.to_string()]);
        }
        cmd
    }
}
