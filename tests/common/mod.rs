//! Common test utilities for rbuild integration tests
//!
//! Helpers for running the `rbuild` binary against a scratch project with
//! stand-in `cget`/`cmake` executables that log their arguments.

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `rbuild` binary command running inside `project_dir` with logging quiet.
pub fn rbuild_cmd(project_dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("rbuild").expect("rbuild binary is built for tests");
    cmd.current_dir(project_dir).env_remove("RUST_LOG").env_remove("ROCM_PATH");
    cmd
}

/// A stand-in tool executable that appends each invocation's arguments as
/// one line to a log file and exits with the status in `fail_status`
/// (0 when the file is absent).
#[cfg(unix)]
pub struct FakeTool {
    pub script: PathBuf,
    pub log: PathBuf,
    fail_status: PathBuf,
}

#[cfg(unix)]
impl FakeTool {
    pub fn create(dir: &Path, name: &str) -> Result<Self> {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join(name);
        let log = dir.join(format!("{name}.log"));
        let fail_status = dir.join(format!("{name}.fail"));
        let body = format!(
            "#!/bin/sh\necho \"$*\" >> '{log}'\nif [ -f '{fail}' ]; then exit \"$(cat '{fail}')\"; fi\nexit 0\n",
            log = log.display(),
            fail = fail_status.display()
        );
        fs::write(&script, body).with_context(|| format!("Failed to write {}", script.display()))?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
        Ok(Self {
            script,
            log,
            fail_status,
        })
    }

    /// Logged invocations, one argument string per call.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log).map(|s| s.lines().map(str::to_string).collect()).unwrap_or_default()
    }

    pub fn clear(&self) {
        let _ = fs::remove_file(&self.log);
    }

    pub fn fail_with(&self, status: i32) -> Result<()> {
        fs::write(&self.fail_status, status.to_string())?;
        Ok(())
    }

    pub fn succeed(&self) {
        let _ = fs::remove_file(&self.fail_status);
    }
}
