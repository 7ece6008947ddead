//! Task model: named units of work and their composition.
//!
//! ```text
//! TaskRegistry
//! ├── Leaf(TaskDef)        input patterns → transform chain → output dir
//! ├── Group(Series)        members one after another, abort on failure
//! ├── Group(Parallel)      members on the rayon pool, join on completion
//! └── Clean                remove a directory tree
//! ```

pub mod preset;
mod registry;
pub mod source;
mod write;

use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;

use crate::log;
use crate::transform::{self, FileRecord, Step, TransformError, TransformSettings};

pub use registry::{GroupMode, TaskEntry, TaskRegistry};
pub use source::PatternSet;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task `{0}` is not registered")]
    Unknown(String),

    #[error("task `{0}` is registered twice")]
    Duplicate(String),

    #[error("group `{group}` references unknown task `{member}`")]
    UnknownMember { group: String, member: String },

    #[error("task groups form a cycle: {0}")]
    Cycle(String),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("{}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },

    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),
}

// ============================================================================
// Definitions
// ============================================================================

/// A leaf task: read inputs, run the chain, write outputs.
#[derive(Debug, Clone)]
pub struct TaskDef {
    pub name: String,
    /// Patterns relative to the project root.
    pub input: Vec<String>,
    pub steps: Vec<Step>,
    /// Output directory relative to the project root.
    pub output: PathBuf,
    /// Final file name, applied on write.
    pub rename: Option<String>,
}

impl TaskDef {
    pub fn new(name: impl Into<String>, input: Vec<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            input,
            steps: Vec::new(),
            output: output.into(),
            rename: None,
        }
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps = steps.into_iter().collect();
        self
    }

    pub fn rename(mut self, name: Option<String>) -> Self {
        self.rename = name;
        self
    }

    pub fn patterns(&self) -> Result<PatternSet, TaskError> {
        PatternSet::parse(&self.input)
    }

    fn run(&self, ctx: &TaskContext) -> Result<TaskReport, TaskError> {
        let start = Instant::now();
        crate::debug!("task"; "starting `{}`", self.name);

        let files = self.patterns()?.collect(&ctx.root)?;
        let records = source::read_inputs(&files)?
            .into_iter()
            .map(|(file, contents)| FileRecord::new(file.relative, file.path, contents))
            .collect();

        let records = transform::apply_chain(&self.name, &self.steps, records, &ctx.settings)?;
        let written =
            write::write_records(&ctx.root.join(&self.output), records, self.rename.as_deref())?;

        log!("task"; "finished `{}` after {} ms", self.name, start.elapsed().as_millis());
        Ok(TaskReport { written })
    }
}

/// Shared, read-only state for running tasks.
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub root: PathBuf,
    pub settings: TransformSettings,
}

/// Files produced by a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub written: Vec<PathBuf>,
}

impl TaskReport {
    pub fn merge(&mut self, other: Self) {
        self.written.extend(other.written);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_leaf_copy_task() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/assets/font/inter")).unwrap();
        fs::write(root.join("src/assets/font/inter/inter.woff2"), b"font").unwrap();

        let ctx = TaskContext {
            root: root.to_path_buf(),
            settings: TransformSettings::default(),
        };
        let def = TaskDef::new(
            "compile-font",
            vec!["./src/assets/font/**/*".into()],
            "build/src/assets/font",
        );
        let report = def.run(&ctx).unwrap();
        let expected = root.join("build/src/assets/font/inter/inter.woff2");
        assert_eq!(report.written, vec![expected.clone()]);
        assert_eq!(fs::read(expected).unwrap(), b"font");
    }

    #[test]
    fn test_leaf_missing_input() {
        let dir = TempDir::new().unwrap();
        let ctx = TaskContext {
            root: dir.path().to_path_buf(),
            settings: TransformSettings::default(),
        };
        let def = TaskDef::new("compile-scss", vec!["./src/scss/index.scss".into()], "build");
        assert!(matches!(def.run(&ctx), Err(TaskError::MissingInput(_))));
    }

    #[test]
    fn test_report_merge() {
        let mut a = TaskReport {
            written: vec![PathBuf::from("a")],
        };
        a.merge(TaskReport {
            written: vec![PathBuf::from("b")],
        });
        assert_eq!(a.written, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }
}
