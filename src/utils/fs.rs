//! File system helpers used by the configuration resolver, the requirement
//! expander and the pipeline.
//!
//! Nothing here takes locks or writes atomically; a crash mid-write leaves
//! whatever the OS flushed.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::core::RbuildError;

/// Creates `path` and any missing parents.
///
/// Fails with [`RbuildError::FileSystemError`] if the path exists but is not a
/// directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| {
            format!(
                "Failed to create directory: {}\n\nCheck directory permissions and path validity",
                path.display()
            )
        })?;
    } else if !path.is_dir() {
        return Err(RbuildError::FileSystemError {
            operation: "create directory (path exists but is not a directory)".to_string(),
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(())
}

/// Creates the parent directory of `path`, if it has one.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Recursively removes `path` if it exists. A missing path is not an error.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Reads `path` as lines. An absent file yields no lines.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Overwrites `path` with `lines`, one per line, each newline-terminated.
///
/// Nothing is written when `lines` is empty. The parent directory is created
/// on demand.
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    if lines.is_empty() {
        return Ok(());
    }
    ensure_parent_dir(path)?;
    let mut content = String::new();
    for line in lines {
        content.push_str(line.as_ref());
        content.push('\n');
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Lexically normalizes a path by dropping `.` and folding `..`.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Resolves `path` the way a user would expect on the command line.
///
/// A leading `~` is expanded to the home directory. Absolute paths are
/// returned unchanged; relative paths are joined onto `start` (or the current
/// directory when `start` is `None`) and normalized.
pub fn actual_path(path: &str, start: Option<&Path>) -> Result<PathBuf> {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        return Ok(candidate.to_path_buf());
    }

    let expanded = PathBuf::from(shellexpand::tilde(path).into_owned());
    if expanded.is_absolute() {
        return Ok(normalize_path(&expanded));
    }

    let base = match start {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    Ok(normalize_path(&base.join(expanded)))
}
