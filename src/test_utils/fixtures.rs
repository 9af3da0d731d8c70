//! Scratch project directories for pipeline and CLI tests.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::{CONFIG_FILE_NAME, REQUIREMENTS_FILE};

/// A temporary project directory that is removed on drop.
///
/// ```rust,no_run
/// use rbuild::test_utils::ProjectFixture;
///
/// # fn example() -> anyhow::Result<()> {
/// let project = ProjectFixture::new()?
///     .with_config("[main]\ndeps = -f requirements.txt\n")?
///     .with_requirements(&["acme/lib@1.0"])?;
/// assert!(project.path().join("rbuild.ini").exists());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("Failed to create temporary project directory")?,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write fixture: {}", path.display()))?;
        Ok(path)
    }

    /// Writes `rbuild.ini`.
    pub fn with_config(self, content: &str) -> Result<Self> {
        self.write(CONFIG_FILE_NAME, content)?;
        Ok(self)
    }

    /// Writes `requirements.txt`, one requirement per line.
    pub fn with_requirements(self, lines: &[&str]) -> Result<Self> {
        self.write_requirements(lines)?;
        Ok(self)
    }

    /// Rewrites `requirements.txt` in place.
    pub fn write_requirements(&self, lines: &[&str]) -> Result<PathBuf> {
        let mut content = lines.join("\n");
        content.push('\n');
        self.write(REQUIREMENTS_FILE, &content)
    }

    /// Contents of the fingerprint record under `deps/`, if any.
    #[must_use]
    pub fn stored_hash(&self) -> Option<String> {
        fs::read_to_string(self.dir.path().join("deps").join("hash")).ok().map(|s| s.trim().to_string())
    }
}
