//! Typed option layers and the three-way merge that produces [`BuildOptions`].
//!
//! Options come from three places, later ones winning:
//!
//! 1. Built-in defaults derived from the project directory
//! 2. The selected session of the configuration source
//! 3. Explicit overrides (command-line flags)
//!
//! An empty value (empty string, empty path, empty list) never replaces a
//! non-empty one. Lists are replaced wholesale, never concatenated.

use std::path::{Path, PathBuf};

/// Keys whose values are multi-line lists in the configuration source.
pub const LIST_KEYS: &[&str] = &["global_define", "define", "ignore", "deps"];

/// One partially-specified source of options.
///
/// `None` and empty values mean "not specified by this layer".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionLayer {
    /// Dependency prefix directory
    pub deps_dir: Option<PathBuf>,
    /// Project source directory
    pub source_dir: Option<PathBuf>,
    /// Native build directory
    pub build_dir: Option<PathBuf>,
    /// Defines passed to the dependency tool's `init`
    pub global_define: Option<Vec<String>>,
    /// Defines passed to the build tool's configure step
    pub define: Option<Vec<String>>,
    /// Dependency identifier prefixes that are never installed
    pub ignore: Option<Vec<String>>,
    /// Requirement lines (may contain `-f <file>` includes)
    pub deps: Option<Vec<String>>,
    /// C++ compiler
    pub cxx: Option<String>,
    /// C compiler
    pub cc: Option<String>,
    /// CMake toolchain file
    pub toolchain: Option<String>,
}

fn pick<T>(earlier: Option<T>, later: Option<T>, is_empty: impl Fn(&T) -> bool) -> Option<T> {
    match later {
        Some(value) if !is_empty(&value) => Some(value),
        _ => earlier,
    }
}

impl OptionLayer {
    /// Lays `later` over `self`: each non-empty field of `later` wins.
    #[must_use]
    pub fn overlay(self, later: Self) -> Self {
        let path_empty = |p: &PathBuf| p.as_os_str().is_empty();
        let list_empty = |v: &Vec<String>| v.is_empty();
        let str_empty = |s: &String| s.is_empty();

        Self {
            deps_dir: pick(self.deps_dir, later.deps_dir, path_empty),
            source_dir: pick(self.source_dir, later.source_dir, path_empty),
            build_dir: pick(self.build_dir, later.build_dir, path_empty),
            global_define: pick(self.global_define, later.global_define, list_empty),
            define: pick(self.define, later.define, list_empty),
            ignore: pick(self.ignore, later.ignore, list_empty),
            deps: pick(self.deps, later.deps, list_empty),
            cxx: pick(self.cxx, later.cxx, str_empty),
            cc: pick(self.cc, later.cc, str_empty),
            toolchain: pick(self.toolchain, later.toolchain, str_empty),
        }
    }
}

/// The effective, immutable option set the pipeline runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    deps_dir: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
    global_define: Vec<String>,
    define: Vec<String>,
    ignore: Vec<String>,
    deps: Vec<String>,
    cxx: Option<String>,
    cc: Option<String>,
    toolchain: Option<String>,
}

impl BuildOptions {
    /// Built-in defaults for a project rooted at `project_dir`.
    #[must_use]
    pub fn defaults_layer(project_dir: &Path) -> OptionLayer {
        OptionLayer {
            deps_dir: Some(project_dir.join("deps")),
            source_dir: Some(project_dir.to_path_buf()),
            build_dir: Some(project_dir.join("build")),
            global_define: Some(Vec::new()),
            define: Some(Vec::new()),
            ignore: Some(Vec::new()),
            deps: Some(Vec::new()),
            cxx: None,
            cc: None,
            toolchain: None,
        }
    }

    /// Deterministic three-way merge: defaults, then session, then overrides.
    #[must_use]
    pub fn merge(project_dir: &Path, session: OptionLayer, overrides: OptionLayer) -> Self {
        let merged = Self::defaults_layer(project_dir).overlay(session).overlay(overrides);

        Self {
            deps_dir: merged.deps_dir.unwrap_or_else(|| project_dir.join("deps")),
            source_dir: merged.source_dir.unwrap_or_else(|| project_dir.to_path_buf()),
            build_dir: merged.build_dir.unwrap_or_else(|| project_dir.join("build")),
            global_define: merged.global_define.unwrap_or_default(),
            define: merged.define.unwrap_or_default(),
            ignore: merged.ignore.unwrap_or_default(),
            deps: merged.deps.unwrap_or_default(),
            cxx: merged.cxx,
            cc: merged.cc,
            toolchain: merged.toolchain,
        }
    }

    /// Dependency prefix directory.
    #[must_use]
    pub fn deps_dir(&self) -> &Path {
        &self.deps_dir
    }

    /// Project source directory.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Native build directory.
    #[must_use]
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    #[must_use]
    pub fn global_define(&self) -> &[String] {
        &self.global_define
    }

    #[must_use]
    pub fn define(&self) -> &[String] {
        &self.define
    }

    #[must_use]
    pub fn ignore(&self) -> &[String] {
        &self.ignore
    }

    #[must_use]
    pub fn deps(&self) -> &[String] {
        &self.deps
    }

    #[must_use]
    pub fn cxx(&self) -> Option<&str> {
        self.cxx.as_deref()
    }

    #[must_use]
    pub fn cc(&self) -> Option<&str> {
        self.cc.as_deref()
    }

    #[must_use]
    pub fn toolchain(&self) -> Option<&str> {
        self.toolchain.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_defaults_only() {
        let opts = BuildOptions::merge(Path::new("/proj"), OptionLayer::default(), OptionLayer::default());
        assert_eq!(opts.deps_dir(), Path::new("/proj/deps"));
        assert_eq!(opts.source_dir(), Path::new("/proj"));
        assert_eq!(opts.build_dir(), Path::new("/proj/build"));
        assert!(opts.deps().is_empty());
        assert!(opts.cxx().is_none());
    }

    #[test]
    fn test_later_layers_win() {
        let session = OptionLayer {
            deps_dir: Some(PathBuf::from("/session/deps")),
            define: Some(strings(&["A=1"])),
            cxx: Some("g++".into()),
            ..OptionLayer::default()
        };
        let overrides = OptionLayer {
            define: Some(strings(&["B=2", "C=3"])),
            cxx: Some("clang++".into()),
            ..OptionLayer::default()
        };

        let opts = BuildOptions::merge(Path::new("/proj"), session, overrides);
        assert_eq!(opts.deps_dir(), Path::new("/session/deps"));
        // lists are replaced, not concatenated
        assert_eq!(opts.define(), strings(&["B=2", "C=3"]).as_slice());
        assert_eq!(opts.cxx(), Some("clang++"));
    }

    #[test]
    fn test_empty_values_never_clobber() {
        let session = OptionLayer {
            deps: Some(strings(&["-f requirements.txt"])),
            cc: Some("gcc".into()),
            build_dir: Some(PathBuf::from("/out")),
            ..OptionLayer::default()
        };
        let overrides = OptionLayer {
            deps: Some(Vec::new()),
            cc: Some(String::new()),
            build_dir: Some(PathBuf::new()),
            ..OptionLayer::default()
        };

        let opts = BuildOptions::merge(Path::new("/proj"), session, overrides);
        assert_eq!(opts.deps(), strings(&["-f requirements.txt"]).as_slice());
        assert_eq!(opts.cc(), Some("gcc"));
        assert_eq!(opts.build_dir(), Path::new("/out"));
    }
}
