//! The on-disk fingerprint record at `<deps_dir>/hash`.
//!
//! The record is a single line holding the fingerprint of the last fully
//! successful dependency preparation. It is written only after every install
//! succeeded, so a failed or interrupted run never looks up to date.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::constants::HASH_FILE_NAME;
use crate::utils::fs::{read_lines, write_lines};

/// Handle on the fingerprint record of one dependency directory.
#[derive(Debug, Clone)]
pub struct DependencyCache {
    deps_dir: PathBuf,
}

impl DependencyCache {
    #[must_use]
    pub fn new(deps_dir: impl Into<PathBuf>) -> Self {
        Self {
            deps_dir: deps_dir.into(),
        }
    }

    /// Path of the record file.
    #[must_use]
    pub fn record_path(&self) -> PathBuf {
        self.deps_dir.join(HASH_FILE_NAME)
    }

    /// The stored fingerprint, or `None` when no record exists.
    pub fn stored(&self) -> Result<Option<String>> {
        let path = self.record_path();
        if !path.exists() {
            return Ok(None);
        }
        let lines = read_lines(&path)?;
        Ok(lines.first().map(|line| line.trim().to_string()).filter(|h| !h.is_empty()))
    }

    /// True when a record exists and its first line equals `hash`.
    pub fn matches(&self, hash: &str) -> Result<bool> {
        let stored = self.stored()?;
        tracing::debug!(
            target: "cache",
            "Fingerprint check in {}: stored={:?} current={}",
            self.deps_dir.display(),
            stored,
            hash
        );
        Ok(stored.as_deref() == Some(hash))
    }

    /// Overwrites the record with `hash`.
    pub fn store(&self, hash: &str) -> Result<()> {
        let path = self.record_path();
        write_lines(&path, &[hash]).context("Failed to write the dependency fingerprint record")?;
        tracing::debug!(target: "cache", "Stored fingerprint {} in {}", hash, path.display());
        Ok(())
    }
}

/// True when `<deps_dir>/hash` exists and matches `hash`.
pub fn hash_matches(deps_dir: &Path, hash: &str) -> Result<bool> {
    DependencyCache::new(deps_dir).matches(hash)
}

/// Writes `hash` as the record of `deps_dir`.
pub fn store(deps_dir: &Path, hash: &str) -> Result<()> {
    DependencyCache::new(deps_dir).store(hash)
}
