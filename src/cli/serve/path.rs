//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

/// Resolve URL to filesystem path, handling index.html for directories
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);

    // Reject paths with suspicious patterns early
    if clean.contains("..") {
        return None;
    }

    let local = serve_root.join(&clean);

    // Canonicalize to resolve symlinks and verify path is under serve_root
    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Normalize URL: decode, strip query string, trim slashes
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    decoded.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_output() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<p>home</p>").unwrap();
        fs::create_dir_all(dir.path().join("src/css")).unwrap();
        fs::write(dir.path().join("src/css/style.min.css"), ".a{}").unwrap();
        fs::write(dir.path().join("my page.html"), "<p>x</p>").unwrap();
        dir
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("/src/css/style.min.css?v=3"), "src/css/style.min.css");
        assert_eq!(normalize_url("/my%20page.html"), "my page.html");
        assert_eq!(normalize_url("/"), "");
        assert_eq!(normalize_url("/index.html#top"), "index.html");
    }

    #[test]
    fn test_resolve_file_and_index() {
        let dir = make_output();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(
            resolve_path("/src/css/style.min.css", dir.path()),
            Some(root.join("src/css/style.min.css"))
        );
        assert_eq!(resolve_path("/", dir.path()), Some(root.join("index.html")));
        assert_eq!(
            resolve_path("/my%20page.html?x=1", dir.path()),
            Some(root.join("my page.html"))
        );
    }

    #[test]
    fn test_resolve_rejects_traversal_and_missing() {
        let dir = make_output();
        assert_eq!(resolve_path("/../etc/passwd", dir.path()), None);
        assert_eq!(resolve_path("/%2e%2e/secret", dir.path()), None);
        assert_eq!(resolve_path("/nope.html", dir.path()), None);
        // directory without index.html
        assert_eq!(resolve_path("/src/css/", dir.path()), None);
    }
}
