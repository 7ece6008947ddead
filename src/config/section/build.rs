//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "build"    # Output directory (relative to project root), wiped by `dev`/`prod`
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Component, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build output directory.
    pub output: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("build"),
        }
    }
}

impl BuildConfig {
    const OUTPUT: FieldPath = FieldPath::new("build.output");

    /// The clean phase deletes this directory, so it must stay inside the project.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let escapes = self.output.is_absolute()
            || self
                .output
                .components()
                .any(|c| matches!(c, Component::ParentDir));
        let empty = self
            .output
            .components()
            .all(|c| matches!(c, Component::CurDir));

        if empty {
            diag.error(Self::OUTPUT, "output directory must not be the project root");
        } else if escapes {
            diag.error_with_hint(
                Self::OUTPUT,
                format!("`{}` is outside the project", self.output.display()),
                "use a relative path such as \"build\"",
            );
        }
    }
}
