//! Final write of a task's records into its output directory.

use std::fs;
use std::path::{Path, PathBuf};

use super::TaskError;
use crate::transform::FileRecord;

/// Write `records` below `out_dir`, optionally renaming each file.
///
/// Returns the written paths in record order.
pub fn write_records(
    out_dir: &Path,
    records: Vec<FileRecord>,
    rename: Option<&str>,
) -> Result<Vec<PathBuf>, TaskError> {
    let mut written = Vec::with_capacity(records.len());

    for record in records {
        let mut relative = record.relative;
        if let Some(name) = rename {
            relative.set_file_name(name);
        }
        let dest = out_dir.join(relative);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| TaskError::Filesystem {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&dest, &record.contents).map_err(|source| TaskError::Filesystem {
            path: dest.clone(),
            source,
        })?;
        written.push(dest);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_mirrors_relative_paths() {
        let dir = TempDir::new().unwrap();
        let records = vec![
            FileRecord::new("a.woff2", "/src/a.woff2", b"a".to_vec()),
            FileRecord::new("sub/b.ttf", "/src/sub/b.ttf", b"b".to_vec()),
        ];
        let written = write_records(dir.path(), records, None).unwrap();
        assert_eq!(
            written,
            vec![dir.path().join("a.woff2"), dir.path().join("sub/b.ttf")]
        );
        assert_eq!(fs::read(dir.path().join("sub/b.ttf")).unwrap(), b"b");
    }

    #[test]
    fn test_write_with_rename() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("css");
        let records = vec![FileRecord::new("index.css", "/src/index.scss", b"a{}".to_vec())];
        let written = write_records(&out, records, Some("style.min.css")).unwrap();
        assert_eq!(written, vec![out.join("style.min.css")]);
        assert!(!out.join("index.css").exists());
    }
}
