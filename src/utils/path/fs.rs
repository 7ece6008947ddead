//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `to_slash` - forward-slash form used for pattern matching
//! - `strip_dot_prefix` - drop the leading `./` of a pattern

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
///
/// # Example
/// ```ignore
/// let abs = normalize_path(Path::new("./src/scss/index.scss"));
/// ```
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Render a relative path with `/` separators on every platform.
///
/// Glob patterns are written with forward slashes, so watch events and
/// input records are compared in this form.
pub fn to_slash(path: &Path) -> String {
    let parts: Vec<_> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

/// Remove any number of leading `./` segments.
pub fn strip_dot_prefix(pattern: &str) -> &str {
    let mut rest = pattern;
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("src/js/app.js")), "src/js/app.js");
        assert_eq!(to_slash(Path::new("./index.html")), "index.html");
        assert_eq!(to_slash(Path::new("")), "");
    }

    #[test]
    fn test_strip_dot_prefix() {
        assert_eq!(strip_dot_prefix("./*.html"), "*.html");
        assert_eq!(strip_dot_prefix("././src/js"), "src/js");
        assert_eq!(strip_dot_prefix("src/js"), "src/js");
        assert_eq!(strip_dot_prefix("../up"), "../up");
    }
}
