//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/src/scss/     ← start
/// /home/user/site/assetflow.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("src/scss/module");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join("assetflow.toml"), "").unwrap();

        let found = find_config_file(Path::new("assetflow.toml"), &nested).unwrap();
        assert_eq!(found, temp.path().join("assetflow.toml"));
    }

    #[test]
    fn test_find_config_file_missing() {
        let temp = TempDir::new().unwrap();
        let found = find_config_file(Path::new("no-such-config-4b1d.toml"), temp.path());
        assert!(found.is_none());
    }

    #[test]
    fn test_find_config_file_absolute() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        assert!(find_config_file(&path, temp.path()).is_none());
        std::fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path, Path::new("/")), Some(path));
    }
}
