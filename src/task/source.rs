//! Input selection: glob patterns resolved against the project root.
//!
//! Pattern syntax is the `glob` crate's plus:
//! - `{a,b}` brace alternatives
//! - `!pattern` to exclude matches of earlier patterns
//! - a leading `./` is ignored
//!
//! Every include pattern has a *base*, the leading directories without glob
//! metacharacters. A matched file's path below its base becomes the record's
//! relative path, which mirrors it into the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use rustc_hash::FxHashSet;

use super::TaskError;
use crate::utils::path::strip_dot_prefix;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A file selected by a pattern set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub relative: PathBuf,
}

/// One brace-expanded include pattern.
#[derive(Debug, Clone)]
struct Include {
    glob: String,
    base: PathBuf,
    /// No metacharacters: names exactly one file.
    literal: bool,
    matcher: Pattern,
}

impl Include {
    /// Whether files below `base` can be more than one directory deep.
    fn recursive(&self) -> bool {
        if self.literal {
            return false;
        }
        let rest = Path::new(&self.glob)
            .strip_prefix(&self.base)
            .unwrap_or(Path::new(&self.glob));
        rest.components().count() > 1
    }
}

/// Ordered include patterns plus exclusions.
#[derive(Debug, Clone)]
pub struct PatternSet {
    includes: Vec<Include>,
    excludes: Vec<Pattern>,
}

impl PatternSet {
    pub fn parse<S: AsRef<str>>(patterns: &[S]) -> Result<Self, TaskError> {
        let mut includes = Vec::new();
        let mut excludes = Vec::new();

        for raw in patterns {
            let raw = raw.as_ref();
            let (negated, body) = match raw.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, raw),
            };
            let body = strip_dot_prefix(body);

            for glob in expand_braces(body) {
                let matcher = Pattern::new(&glob).map_err(|e| TaskError::Pattern {
                    pattern: raw.to_string(),
                    message: e.to_string(),
                })?;
                if negated {
                    excludes.push(matcher);
                } else {
                    let literal = !has_magic(&glob);
                    includes.push(Include {
                        base: glob_base(&glob),
                        literal,
                        matcher,
                        glob,
                    });
                }
            }
        }

        Ok(Self { includes, excludes })
    }

    /// Whether a root-relative path is selected.
    pub fn matches(&self, relative: &Path) -> bool {
        self.includes
            .iter()
            .any(|inc| inc.matcher.matches_path_with(relative, MATCH_OPTIONS))
            && !self.is_excluded(relative)
    }

    fn is_excluded(&self, relative: &Path) -> bool {
        self.excludes
            .iter()
            .any(|p| p.matches_path_with(relative, MATCH_OPTIONS))
    }

    /// Root-relative directories to watch, with their recursion flag.
    pub fn watch_roots(&self) -> impl Iterator<Item = (&Path, bool)> {
        self.includes
            .iter()
            .map(|inc| (inc.base.as_path(), inc.recursive()))
    }

    /// Resolve every pattern against `root`.
    ///
    /// Files keep pattern order, then path order; a file matched twice keeps
    /// its first position. A literal path that does not exist is an error,
    /// a glob matching nothing is not.
    pub fn collect(&self, root: &Path) -> Result<Vec<InputFile>, TaskError> {
        let escaped_root = Pattern::escape(&root.to_string_lossy());
        let mut seen = FxHashSet::default();
        let mut files = Vec::new();

        for inc in &self.includes {
            let base = root.join(&inc.base);

            let mut matched = if inc.literal {
                let path = root.join(&inc.glob);
                if !path.exists() {
                    return Err(TaskError::MissingInput(path));
                }
                vec![path]
            } else {
                let full = format!("{}/{}", escaped_root.trim_end_matches('/'), inc.glob);
                let paths = glob::glob_with(&full, MATCH_OPTIONS).map_err(|e| TaskError::Pattern {
                    pattern: inc.glob.clone(),
                    message: e.to_string(),
                })?;
                paths
                    .map(|entry| {
                        entry.map_err(|e| TaskError::Filesystem {
                            path: e.path().to_path_buf(),
                            source: e.into_error(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?
            };
            matched.sort();

            for path in matched {
                if !path.is_file() {
                    continue;
                }
                let Ok(from_root) = path.strip_prefix(root) else {
                    continue;
                };
                if self.is_excluded(from_root) || !seen.insert(path.clone()) {
                    continue;
                }
                let relative = path
                    .strip_prefix(&base)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| from_root.to_path_buf());
                files.push(InputFile { path, relative });
            }
        }

        Ok(files)
    }
}

/// Read every selected file.
pub fn read_inputs(files: &[InputFile]) -> Result<Vec<(InputFile, Vec<u8>)>, TaskError> {
    files
        .iter()
        .map(|file| {
            let contents = fs::read(&file.path).map_err(|source| TaskError::Filesystem {
                path: file.path.clone(),
                source,
            })?;
            Ok((file.clone(), contents))
        })
        .collect()
}

fn has_magic(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Leading directories that contain no metacharacters. A literal path's
/// base is its parent directory.
fn glob_base(pattern: &str) -> PathBuf {
    let path = Path::new(pattern);
    if !has_magic(pattern) {
        return path.parent().map(Path::to_path_buf).unwrap_or_default();
    }
    let mut base = PathBuf::new();
    let mut components = path.components().peekable();
    while let Some(component) = components.next() {
        // the last component is always the file part
        if components.peek().is_none() {
            break;
        }
        let text = component.as_os_str().to_string_lossy();
        if has_magic(&text) {
            break;
        }
        base.push(component);
    }
    base
}

/// Expand `{a,b}` alternatives. Unbalanced braces are left untouched.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let i = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(i),
            _ => {}
        }
    }
    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| {
            let alt = &pattern[w[0] + 1..w[1]];
            expand_braces(&format!("{prefix}{alt}{suffix}"))
        })
        .collect()
}
