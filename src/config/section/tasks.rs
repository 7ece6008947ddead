//! `[tasks.<key>]` section configuration.
//!
//! Overrides the input patterns, output directory or final file name of a
//! preset task. Keys are the preset names (`html`, `scss`, `javascript`, ...).
//!
//! # Example
//!
//! ```toml
//! [tasks.javascript]
//! input = ["./src/js/**/*.js", "!./src/js/vendor/**"]
//! new_name = "app.min.js"
//!
//! [tasks.html]
//! input = "./pages/*.html"
//! output = "build/"
//! ```

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Either a single pattern or a list of patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputSpec {
    One(String),
    Many(Vec<String>),
}

impl InputSpec {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(pattern) => vec![pattern],
            Self::Many(patterns) => patterns,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::One(pattern) => pattern.trim().is_empty(),
            Self::Many(patterns) => patterns.iter().all(|p| p.trim().is_empty()),
        }
    }
}

/// Override of a single preset task. Unset fields keep the preset value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskOverride {
    pub input: Option<InputSpec>,
    /// Output directory, relative to the project root.
    pub output: Option<PathBuf>,
    /// Final file name of the task output.
    pub new_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TasksConfig(pub BTreeMap<String, TaskOverride>);

impl TasksConfig {
    pub fn get(&self, key: &str) -> Option<&TaskOverride> {
        self.0.get(key)
    }

    pub fn validate(&self, known: &[&str], build_output: &Path, diag: &mut ConfigDiagnostics) {
        for (key, task) in &self.0 {
            if !known.contains(&key.as_str()) {
                diag.error_with_hint(
                    FieldPath::owned(format!("tasks.{key}")),
                    format!("unknown task key `{key}`"),
                    format!("known keys: {}", known.join(", ")),
                );
                continue;
            }

            if let Some(input) = &task.input
                && input.is_empty()
            {
                diag.error(
                    FieldPath::owned(format!("tasks.{key}.input")),
                    "input must name at least one pattern",
                );
            }

            if let Some(name) = &task.new_name
                && (name.is_empty() || name.contains(['/', '\\']))
            {
                diag.error_with_hint(
                    FieldPath::owned(format!("tasks.{key}.new_name")),
                    format!("`{name}` is not a plain file name"),
                    "use `output` to change the directory",
                );
            }

            if let Some(output) = &task.output
                && !is_within(output, build_output)
            {
                diag.warn(
                    FieldPath::owned(format!("tasks.{key}.output")),
                    format!(
                        "`{}` is outside `{}` and is not removed by the clean phase",
                        output.display(),
                        build_output.display()
                    ),
                );
            }
        }
    }
}

/// Lexical containment check; neither path has to exist yet.
fn is_within(path: &Path, dir: &Path) -> bool {
    fn clean(p: &Path) -> Vec<Component<'_>> {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }
    let path = clean(path);
    let dir = clean(dir);
    path.len() >= dir.len() && path[..dir.len()] == dir[..]
}
