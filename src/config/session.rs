//! Session selection.
//!
//! A session names a section of the configuration source. Three request forms
//! exist:
//!
//! - `default` - the default section, always available (possibly empty)
//! - `try:<name>` - section `<name>` if present, otherwise `default`
//! - `<name>` - section `<name>`, which must exist

use anyhow::Result;
use std::fmt;
use std::path::Path;

use super::ini::IniDocument;
use super::options::{LIST_KEYS, OptionLayer};
use crate::constants::{DEFAULT_SECTION, TRY_PREFIX};
use crate::core::RbuildError;
use crate::utils::fs::actual_path;

/// A parsed session request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRequest {
    /// The default section
    Default,
    /// A named section, falling back to the default section when absent
    Try(String),
    /// A named section that must exist
    Named(String),
}

impl SessionRequest {
    /// Parses a session string such as `default`, `try:develop` or `ci`.
    ///
    /// An empty string means `default`.
    #[must_use]
    pub fn parse(session: &str) -> Self {
        let session = session.trim();
        if session.is_empty() || session == DEFAULT_SECTION {
            Self::Default
        } else if let Some(name) = session.strip_prefix(TRY_PREFIX) {
            Self::Try(name.to_string())
        } else {
            Self::Named(session.to_string())
        }
    }

    /// Name of the section this request resolves to in `doc`.
    pub fn section_in<'a>(&'a self, doc: &IniDocument) -> Result<&'a str> {
        match self {
            Self::Default => Ok(DEFAULT_SECTION),
            Self::Try(name) if doc.has_section(name) => Ok(name.as_str()),
            Self::Try(name) => {
                tracing::debug!(
                    target: "config",
                    "Session [{}] not found in {} (sections: {}), using [{}]",
                    name,
                    doc.origin(),
                    doc.section_names().collect::<Vec<_>>().join(", "),
                    DEFAULT_SECTION
                );
                Ok(DEFAULT_SECTION)
            }
            Self::Named(name) if doc.has_section(name) => Ok(name.as_str()),
            Self::Named(name) => Err(RbuildError::UnknownSession {
                session: name.clone(),
            }
            .into()),
        }
    }
}

impl fmt::Display for SessionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str(DEFAULT_SECTION),
            Self::Try(name) => write!(f, "{TRY_PREFIX}{name}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Splits a multi-line value into its non-empty trimmed lines.
pub fn parse_lines(value: &str) -> Vec<String> {
    value.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect()
}

/// Resolves `request` against `doc` into an [`OptionLayer`].
///
/// Directory values that are relative are resolved against `project_dir`.
/// Keys that are not options (helper variables used for interpolation) are
/// accepted and ignored.
pub fn session_layer(doc: &IniDocument, request: &SessionRequest, project_dir: &Path) -> Result<OptionLayer> {
    let section = request.section_in(doc)?;
    let items = doc.items(section)?;
    tracing::debug!(target: "config", "Resolved session '{}' to section [{}]", request, section);

    let mut layer = OptionLayer::default();
    for (key, value) in items {
        if LIST_KEYS.contains(&key.as_str()) {
            let list = parse_lines(&value);
            match key.as_str() {
                "global_define" => layer.global_define = Some(list),
                "define" => layer.define = Some(list),
                "ignore" => layer.ignore = Some(list),
                _ => layer.deps = Some(list),
            }
            continue;
        }

        let value = value.trim().to_string();
        match key.as_str() {
            "deps_dir" | "source_dir" | "build_dir" => {
                let path = if value.is_empty() {
                    None
                } else {
                    Some(actual_path(&value, Some(project_dir))?)
                };
                match key.as_str() {
                    "deps_dir" => layer.deps_dir = path,
                    "source_dir" => layer.source_dir = path,
                    _ => layer.build_dir = path,
                }
            }
            "cxx" => layer.cxx = Some(value),
            "cc" => layer.cc = Some(value),
            "toolchain" => layer.toolchain = Some(value),
            other => {
                tracing::trace!(target: "config", "Ignoring non-option key '{}' in [{}]", other, section);
            }
        }
    }

    Ok(layer)
}
