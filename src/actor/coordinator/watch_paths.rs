use std::path::{Path, PathBuf};

use notify::RecursiveMode;

use crate::actor::fs::WatchSet;

/// Directories to watch for a set of bindings.
///
/// Each pattern contributes its glob base. A base watched recursively
/// covers every path below it, so nested roots are dropped.
pub(super) fn collect_watch_paths(set: &WatchSet) -> Vec<(PathBuf, RecursiveMode)> {
    let mut roots: Vec<(PathBuf, bool)> = Vec::new();
    for binding in &set.bindings {
        for (base, recursive) in binding.patterns().watch_roots() {
            let path = if base.as_os_str().is_empty() {
                set.root.clone()
            } else {
                set.root.join(base)
            };
            match roots.iter_mut().find(|(p, _)| *p == path) {
                Some((_, existing)) => *existing |= recursive,
                None => roots.push((path, recursive)),
            }
        }
    }

    roots.sort();
    drop_covered(&mut roots, &set.output_dir);

    roots
        .into_iter()
        .map(|(path, recursive)| {
            let mode = if recursive {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            (path, mode)
        })
        .collect()
}

/// Drop roots inside the output directory and roots already covered by a
/// recursive ancestor.
fn drop_covered(roots: &mut Vec<(PathBuf, bool)>, output_dir: &Path) {
    let snapshot = roots.clone();
    roots.retain(|(path, _)| {
        !path.starts_with(output_dir)
            && !snapshot
                .iter()
                .any(|(other, recursive)| *recursive && other != path && path.starts_with(other))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::fs::WatchBinding;
    use crate::task::PatternSet;

    fn set(patterns: &[&[&str]]) -> WatchSet {
        WatchSet {
            bindings: patterns
                .iter()
                .map(|p| WatchBinding::new(PatternSet::parse(p).unwrap(), "task", true))
                .collect(),
            root: PathBuf::from("/project"),
            output_dir: PathBuf::from("/project/build"),
        }
    }

    #[test]
    fn test_bases_and_recursion() {
        let paths = collect_watch_paths(&set(&[
            &["./*.html"],
            &["./src/js/**/*.js"],
            &["./src/scss/index.scss"],
        ]));
        assert_eq!(
            paths,
            vec![
                (PathBuf::from("/project"), RecursiveMode::NonRecursive),
                (PathBuf::from("/project/src/js"), RecursiveMode::Recursive),
                (PathBuf::from("/project/src/scss"), RecursiveMode::NonRecursive),
            ]
        );
    }

    #[test]
    fn test_recursive_ancestor_covers_children() {
        let paths = collect_watch_paths(&set(&[&["./src/**/*.scss"], &["./src/scss/module/module.scss"]]));
        assert_eq!(paths, vec![(PathBuf::from("/project/src"), RecursiveMode::Recursive)]);
    }

    #[test]
    fn test_same_base_upgrades_to_recursive() {
        let paths = collect_watch_paths(&set(&[&["./src/scss/index.scss"], &["./src/scss/**/*.scss"]]));
        assert_eq!(
            paths,
            vec![(PathBuf::from("/project/src/scss"), RecursiveMode::Recursive)]
        );
    }

    #[test]
    fn test_output_roots_dropped() {
        let paths = collect_watch_paths(&set(&[&["./build/**/*"], &["./src/js/*.js"]]));
        assert_eq!(
            paths,
            vec![(PathBuf::from("/project/src/js"), RecursiveMode::NonRecursive)]
        );
    }
}
