//! Configuration resolution for rbuild
//!
//! Turns a project directory, a session request and caller overrides into the
//! single effective [`BuildOptions`] the pipeline runs with.
//!
//! # Sources
//!
//! 1. **Built-in defaults** - `deps_dir = <project>/deps`, `source_dir = <project>`,
//!    `build_dir = <project>/build`, empty lists
//! 2. **Configuration source** - `<project>/rbuild.ini`, or when that file is
//!    absent a generated template:
//!
//!    ```text
//!    [default]
//!    ignore =
//!        danmar/cppcheck
//!        ...
//!    deps = -f requirements.txt
//!    ```
//!
//!    (`-f dev-requirements.txt` when that file exists in the project)
//! 3. **Overrides** - command-line flags
//!
//! # Modules
//!
//! - [`ini`] - section parser with `${...}` interpolation
//! - [`session`] - `default` / `try:<name>` / `<name>` selection
//! - [`options`] - typed option layers and the merge

pub mod ini;
pub mod options;
pub mod session;

pub use ini::IniDocument;
pub use options::{BuildOptions, LIST_KEYS, OptionLayer};
pub use session::{SessionRequest, parse_lines, session_layer};

use anyhow::Result;
use std::path::Path;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_IGNORE, DEFAULT_ROCM_PATH, DEFAULT_SECTION, DEV_REQUIREMENTS_FILE,
    REQUIREMENTS_FILE, ROCM_PATH_VAR,
};

/// Origin name used in errors for the generated configuration.
pub const DEFAULT_CONFIG_ORIGIN: &str = "<default rbuild.ini>";

/// Renders the configuration used when a project has no `rbuild.ini`.
#[must_use]
pub fn default_config_text(project_dir: &Path) -> String {
    let requirements = if project_dir.join(DEV_REQUIREMENTS_FILE).exists() {
        DEV_REQUIREMENTS_FILE
    } else {
        REQUIREMENTS_FILE
    };

    let mut text = format!("[{DEFAULT_SECTION}]\nignore =\n");
    for dep in DEFAULT_IGNORE {
        text.push_str("    ");
        text.push_str(dep);
        text.push('\n');
    }
    text.push_str(&format!("deps = -f {requirements}\n"));
    text
}

/// Loads `<project_dir>/rbuild.ini`, or the generated default when absent.
///
/// The built-in `rocm_path` variable (from `ROCM_PATH`) is seeded into the
/// default section so every section can reference `${rocm_path}`.
pub fn load_config(project_dir: &Path) -> Result<IniDocument> {
    let path = project_dir.join(CONFIG_FILE_NAME);
    let mut doc = if path.exists() {
        tracing::debug!(target: "config", "Loading configuration from {}", path.display());
        IniDocument::load(&path)?
    } else {
        tracing::debug!(
            target: "config",
            "No {} in {}, using the default configuration",
            CONFIG_FILE_NAME,
            project_dir.display()
        );
        IniDocument::parse(DEFAULT_CONFIG_ORIGIN, &default_config_text(project_dir))?
    };

    let rocm_path = std::env::var("ROCM_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ROCM_PATH.to_string());
    doc.seed_default(ROCM_PATH_VAR, rocm_path);
    Ok(doc)
}

/// Resolves the effective options for `session` in the project at `project_dir`.
pub fn resolve_options(project_dir: &Path, session: &str, overrides: OptionLayer) -> Result<BuildOptions> {
    let doc = load_config(project_dir)?;
    let request = SessionRequest::parse(session);
    let layer = session_layer(&doc, &request, project_dir)?;
    Ok(BuildOptions::merge(project_dir, layer, overrides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RbuildError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_when_file_missing() {
        let temp = tempdir().unwrap();
        let opts = resolve_options(temp.path(), "try:main", OptionLayer::default()).unwrap();

        assert_eq!(opts.deps(), ["-f requirements.txt".to_string()].as_slice());
        let expected: Vec<String> = DEFAULT_IGNORE.iter().map(|s| (*s).to_string()).collect();
        assert_eq!(opts.ignore(), expected.as_slice());
        assert_eq!(opts.deps_dir(), temp.path().join("deps"));
    }

    #[test]
    fn test_default_config_prefers_dev_requirements() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(DEV_REQUIREMENTS_FILE), "acme/lib@1.0\n").unwrap();

        let opts = resolve_options(temp.path(), "default", OptionLayer::default()).unwrap();
        assert_eq!(opts.deps(), ["-f dev-requirements.txt".to_string()].as_slice());
    }

    #[test]
    fn test_file_session_and_overrides() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[main]\ndeps = -f requirements.txt\ncxx = ${rocm_path}/llvm/bin/clang++\ndefine = A=1\n",
        )
        .unwrap();

        let overrides = OptionLayer {
            define: Some(vec!["B=2".to_string()]),
            ..OptionLayer::default()
        };
        let opts = resolve_options(temp.path(), "try:main", overrides).unwrap();
        assert_eq!(opts.define(), ["B=2".to_string()].as_slice());
        assert!(opts.cxx().unwrap().ends_with("/llvm/bin/clang++"));
        assert!(opts.ignore().is_empty());
    }

    #[test]
    fn test_unknown_session_is_configuration_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "[foo]\ncc = gcc\n").unwrap();

        let err = resolve_options(temp.path(), "bar", OptionLayer::default()).unwrap_err();
        let typed = err.downcast_ref::<RbuildError>().unwrap();
        assert!(typed.is_configuration_error());
    }
}
