//! Requirement list expansion.
//!
//! The `deps` option holds requirement lines in the dependency tool's own
//! syntax. Each line is tokenized shell-style (`#` starts a comment) and is
//! one of:
//!
//! - `-f <file>` - include the requirement lines of `<file>`. Relative paths
//!   are resolved against the directory of the file that contains the line
//!   (the project directory for the top-level `deps` list).
//! - anything else - a requirement such as `owner/repo@ref -X header`, kept
//!   unless its first token starts with one of the ignored prefixes.
//!
//! Expansion is lazy: [`Requirements`] reads an included file only when the
//! iterator reaches the `-f` line. Order is preserved and nothing is
//! deduplicated. Re-entering a file that is still being expanded is an
//! [`RbuildError::IncludeCycle`]; including the same file from two different
//! places is fine.
//!
//! # Example
//!
//! ```rust,no_run
//! use rbuild::requirements::expand;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let deps = vec!["-f requirements.txt".to_string()];
//! let ignore = vec!["RadeonOpenCompute/rocm-cmake".to_string()];
//! for req in expand(&deps, Path::new("."), &ignore)? {
//!     println!("{req}");
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::RbuildError;
use crate::utils::fs::{actual_path, read_lines};

/// Name used in errors for the top-level `deps` list.
const CONFIG_ORIGIN: &str = "<config>";

/// One normalized requirement: its shell tokens, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    tokens: Vec<String>,
}

impl Requirement {
    /// Builds a requirement from already-split tokens.
    ///
    /// Returns `None` when `tokens` is empty.
    #[must_use]
    pub fn from_tokens(tokens: Vec<String>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Self {
                tokens,
            })
        }
    }

    /// The dependency identifier, i.e. the first token.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.tokens[0]
    }

    /// All tokens, passed as separate arguments to `install`.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// True if the identifier starts with any of `ignore` on a component
    /// boundary.
    ///
    /// `acme/widget` matches `acme/widget`, `acme/widget@v1` and
    /// `acme/widget/sub` but not `acme/widgets@v1`. The `name,url` alias form
    /// counts too, so `rocm-cmake` matches `rocm-cmake,https://...`. A prefix
    /// that itself ends in a separator (`acme/`) matches everything below it.
    #[must_use]
    pub fn is_ignored(&self, ignore: &[String]) -> bool {
        ignore.iter().any(|prefix| prefix_matches(self.id(), prefix))
    }
}

/// Characters that end one component of a dependency identifier.
const COMPONENT_SEPARATORS: &[char] = &['@', '/', ':', '#', ','];

fn prefix_matches(id: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    let Some(rest) = id.strip_prefix(prefix) else {
        return false;
    };
    rest.is_empty() || prefix.ends_with(COMPONENT_SEPARATORS) || rest.starts_with(COMPONENT_SEPARATORS)
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

struct Frame {
    /// Canonical path of the file being read, `None` for the top-level list
    file: Option<PathBuf>,
    /// Display name for errors
    origin: String,
    /// Directory that relative includes are resolved against
    base: PathBuf,
    lines: std::iter::Enumerate<std::vec::IntoIter<String>>,
}

/// Lazy iterator over the requirements of a `deps` list.
///
/// Yields `Err` once and then stops if a line cannot be parsed, an include
/// cannot be read or an include cycle is found.
pub struct Requirements<'a> {
    stack: Vec<Frame>,
    ignore: &'a [String],
}

impl<'a> Requirements<'a> {
    /// Starts expanding `lines`, resolving top-level includes against `base_dir`.
    #[must_use]
    pub fn new(lines: &[String], base_dir: &Path, ignore: &'a [String]) -> Self {
        Self {
            stack: vec![Frame {
                file: None,
                origin: CONFIG_ORIGIN.to_string(),
                base: base_dir.to_path_buf(),
                lines: lines.to_vec().into_iter().enumerate(),
            }],
            ignore,
        }
    }

    fn fail(&mut self, error: RbuildError) -> Option<Result<Requirement>> {
        self.stack.clear();
        Some(Err(error.into()))
    }

    fn include(&mut self, target: &str) -> Result<()> {
        let (base, parent_origin) = match self.stack.last() {
            Some(frame) => (frame.base.clone(), frame.origin.clone()),
            None => return Ok(()),
        };
        let path = actual_path(target, Some(&base))?;
        let canonical = canonical_or_self(&path);

        if self.stack.iter().any(|f| f.file.as_deref() == Some(canonical.as_path())) {
            let mut chain: Vec<String> = self.stack.iter().skip(1).map(|f| f.origin.clone()).collect();
            chain.push(path.display().to_string());
            return Err(RbuildError::IncludeCycle {
                chain: chain.join(" -> "),
            }
            .into());
        }

        if !path.exists() {
            tracing::warn!("Requirement file {} (included from {}) does not exist", path.display(), parent_origin);
        }
        let lines = read_lines(&path)?;
        tracing::trace!("Including {} ({} lines)", path.display(), lines.len());

        let base = path.parent().map_or_else(|| base.clone(), Path::to_path_buf);
        self.stack.push(Frame {
            file: Some(canonical),
            origin: path.display().to_string(),
            base,
            lines: lines.into_iter().enumerate(),
        });
        Ok(())
    }
}

/// Canonicalizes when possible so that `a/../b.txt` and `b.txt` compare equal.
fn canonical_or_self(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

impl Iterator for Requirements<'_> {
    type Item = Result<Requirement>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some((idx, line)) = frame.lines.next() else {
                self.stack.pop();
                continue;
            };
            let line_no = idx + 1;

            let Some(tokens) = shlex::split(&line) else {
                let origin = frame.origin.clone();
                return self.fail(RbuildError::RequirementParse {
                    file: origin,
                    line: line_no,
                    reason: format!("unbalanced quotes in '{}'", line.trim()),
                });
            };

            let Some(first) = tokens.first() else {
                continue;
            };

            if first == "-f" {
                let Some(target) = tokens.get(1) else {
                    let origin = frame.origin.clone();
                    return self.fail(RbuildError::RequirementParse {
                        file: origin,
                        line: line_no,
                        reason: "'-f' requires a file argument".to_string(),
                    });
                };
                if let Err(e) = self.include(target) {
                    self.stack.clear();
                    return Some(Err(e));
                }
                continue;
            }

            let Some(requirement) = Requirement::from_tokens(tokens) else {
                continue;
            };
            if requirement.is_ignored(self.ignore) {
                tracing::debug!("Ignoring requirement '{}'", requirement);
                continue;
            }
            return Some(Ok(requirement));
        }
    }
}

/// Expands `lines` eagerly into a list of requirements.
pub fn expand(lines: &[String], base_dir: &Path, ignore: &[String]) -> Result<Vec<Requirement>> {
    Requirements::new(lines, base_dir, ignore).collect()
}
