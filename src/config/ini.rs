//! Section-structured configuration source (`rbuild.ini`).
//!
//! The format is the classic INI dialect:
//!
//! ```text
//! [default]
//! ignore =
//!     danmar/cppcheck
//!     RadeonOpenCompute/rocm-cmake
//! deps = -f requirements.txt
//!
//! [main]
//! cxx = ${rocm_path}/llvm/bin/clang++
//! define = CMAKE_PREFIX_PATH=${default:prefix}
//! ```
//!
//! Rules:
//! - `[name]` starts a section; section names are case-sensitive and must be
//!   unique.
//! - `key = value` or `key: value`; keys are lower-cased and must be unique
//!   within a section.
//! - Lines starting with `#` or `;` are comments. Comments and blank lines end
//!   a multi-line value.
//! - A line indented deeper than its key continues the value (joined with `\n`).
//! - The `default` section is the fallback for every other section.
//! - `${key}` refers to a key visible from the current section, `${section:key}`
//!   to a key in another section and `$$` is a literal `$`.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::{DEFAULT_SECTION, MAX_INTERPOLATION_DEPTH};
use crate::core::RbuildError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn value_mut(&mut self, key: &str) -> Option<&mut String> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// A parsed configuration source.
///
/// Values are stored raw; interpolation happens in [`IniDocument::items`] so
/// that only the section actually requested has to resolve cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    origin: String,
    defaults: Section,
    sections: Vec<Section>,
}

impl IniDocument {
    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&path.display().to_string(), &content)
    }

    /// Parses configuration text. `origin` names the source in error messages.
    pub fn parse(origin: &str, content: &str) -> Result<Self> {
        let mut doc = Self {
            origin: origin.to_string(),
            defaults: Section::new(DEFAULT_SECTION),
            sections: Vec::new(),
        };
        let mut seen_default_header = false;

        // Index into `sections`, or None for the default section
        let mut current: Option<Option<usize>> = None;
        let mut current_key: Option<String> = None;
        let mut key_indent = 0usize;

        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim_end_matches('\r');
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                current_key = None;
                continue;
            }

            let indent = line.len() - line.trim_start().len();

            if let (Some(section), Some(key)) = (current, current_key.as_deref())
                && indent > key_indent
            {
                let target = match section {
                    Some(i) => &mut doc.sections[i],
                    None => &mut doc.defaults,
                };
                if let Some(value) = target.value_mut(key) {
                    value.push('\n');
                    value.push_str(trimmed);
                }
                continue;
            }

            key_indent = indent;

            if let Some(header) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                let name = header.trim();
                if name.is_empty() {
                    return Err(doc.parse_error(line_no, "empty section name"));
                }
                current_key = None;
                if name == DEFAULT_SECTION {
                    if seen_default_header {
                        return Err(doc.parse_error(line_no, "section [default] already exists"));
                    }
                    seen_default_header = true;
                    current = Some(None);
                } else {
                    if doc.find_section(name).is_some() {
                        return Err(
                            doc.parse_error(line_no, &format!("section [{name}] already exists"))
                        );
                    }
                    doc.sections.push(Section::new(name));
                    current = Some(Some(doc.sections.len() - 1));
                }
                tracing::trace!(target: "config", "{}:{}: section [{}]", doc.origin, line_no, name);
                continue;
            }

            let Some(section) = current else {
                return Err(doc.parse_error(line_no, "entry appears before any [section] header"));
            };

            let Some(split_at) = trimmed.find(['=', ':']) else {
                return Err(doc.parse_error(line_no, "expected 'key = value'"));
            };
            let key = trimmed[..split_at].trim().to_lowercase();
            let value = trimmed[split_at + 1..].trim().to_string();
            if key.is_empty() {
                return Err(doc.parse_error(line_no, "missing key before delimiter"));
            }

            let target = match section {
                Some(i) => &mut doc.sections[i],
                None => &mut doc.defaults,
            };
            if target.get(&key).is_some() {
                let reason = format!("key '{key}' already set in section [{}]", target.name);
                return Err(doc.parse_error(line_no, &reason));
            }
            target.entries.push((key.clone(), value));
            current_key = Some(key);
        }

        Ok(doc)
    }

    fn parse_error(&self, line: usize, reason: &str) -> anyhow::Error {
        RbuildError::ConfigParse {
            file: self.origin.clone(),
            line,
            reason: reason.to_string(),
        }
        .into()
    }

    fn find_section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Name of the source this document was parsed from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// True if a non-default section named `name` exists.
    #[must_use]
    pub fn has_section(&self, name: &str) -> bool {
        self.find_section(name).is_some()
    }

    /// Names of the non-default sections, in file order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Adds `key` to the default section unless the source already defines it.
    pub fn seed_default(&mut self, key: &str, value: impl Into<String>) {
        let key = key.to_lowercase();
        if self.defaults.get(&key).is_none() {
            self.defaults.entries.push((key, value.into()));
        }
    }

    /// Returns every key visible from `section` with interpolation applied.
    ///
    /// Keys from the default section come first, overridden in place by keys
    /// the section defines itself, followed by the section's own new keys.
    /// Asking for `default` returns the default section alone.
    pub fn items(&self, section: &str) -> Result<Vec<(String, String)>> {
        let raw = self.raw_items(section).ok_or_else(|| RbuildError::UnknownSession {
            session: section.to_string(),
        })?;

        let lookup: BTreeMap<&str, &str> = raw.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        raw.iter()
            .map(|(key, value)| {
                let resolved = self.interpolate(section, key, value, &lookup, 1)?;
                Ok((key.clone(), resolved))
            })
            .collect()
    }

    fn raw_items(&self, section: &str) -> Option<Vec<(String, String)>> {
        let mut merged = self.defaults.entries.clone();
        if section == DEFAULT_SECTION {
            return Some(merged);
        }
        let own = self.find_section(section)?;
        for (key, value) in &own.entries {
            match merged.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value.clone(),
                None => merged.push((key.clone(), value.clone())),
            }
        }
        Some(merged)
    }

    fn interpolate(
        &self,
        section: &str,
        key: &str,
        value: &str,
        lookup: &BTreeMap<&str, &str>,
        depth: usize,
    ) -> Result<String> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(interpolation_error(
                section,
                key,
                format!("references nested deeper than {MAX_INTERPOLATION_DEPTH} levels"),
            ));
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            if let Some(tail) = after.strip_prefix('$') {
                out.push('$');
                rest = tail;
            } else if let Some(body) = after.strip_prefix('{') {
                let Some(close) = body.find('}') else {
                    return Err(interpolation_error(section, key, format!("unterminated reference in '{value}'")));
                };
                let reference = &body[..close];
                let resolved = self.resolve_reference(section, key, reference, lookup, depth)?;
                out.push_str(&resolved);
                rest = &body[close + 1..];
            } else {
                return Err(interpolation_error(
                    section,
                    key,
                    format!("'$' must be followed by '$' or '{{', found: '{value}'"),
                ));
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    fn resolve_reference(
        &self,
        section: &str,
        key: &str,
        reference: &str,
        lookup: &BTreeMap<&str, &str>,
        depth: usize,
    ) -> Result<String> {
        let parts: Vec<&str> = reference.split(':').collect();
        match parts.as_slice() {
            [name] => {
                let name = name.trim().to_lowercase();
                let raw = lookup.get(name.as_str()).ok_or_else(|| {
                    interpolation_error(section, key, format!("no option '{name}' to substitute"))
                })?;
                self.interpolate(section, key, raw, lookup, depth + 1)
            }
            [other, name] => {
                let other = other.trim();
                let name = name.trim().to_lowercase();
                let other_items = self.raw_items(other).ok_or_else(|| {
                    interpolation_error(section, key, format!("no section [{other}] to substitute from"))
                })?;
                let other_lookup: BTreeMap<&str, &str> =
                    other_items.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
                let raw = other_lookup.get(name.as_str()).ok_or_else(|| {
                    interpolation_error(section, key, format!("no option '{name}' in section [{other}]"))
                })?;
                self.interpolate(other, key, raw, &other_lookup, depth + 1)
            }
            _ => Err(interpolation_error(
                section,
                key,
                format!("more than one ':' in reference '${{{reference}}}'"),
            )),
        }
    }
}

fn interpolation_error(section: &str, key: &str, reason: String) -> anyhow::Error {
    RbuildError::Interpolation {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
    .into()
}
