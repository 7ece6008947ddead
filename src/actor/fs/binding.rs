use std::path::{Path, PathBuf};

use crate::task::PatternSet;

/// A watched pattern set and the task it triggers.
#[derive(Debug, Clone)]
pub struct WatchBinding {
    patterns: PatternSet,
    /// Task or group run when a matching file changes.
    pub reaction: String,
    /// Reload the browser after the reaction succeeds.
    pub notify: bool,
}

impl WatchBinding {
    pub fn new(patterns: PatternSet, reaction: impl Into<String>, notify: bool) -> Self {
        Self {
            patterns,
            reaction: reaction.into(),
            notify,
        }
    }

    /// Whether a root-relative path triggers this binding.
    pub fn matches(&self, relative: &Path) -> bool {
        self.patterns.matches(relative)
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }
}

/// Everything the watcher needs to turn raw events into reactions.
#[derive(Debug, Clone)]
pub struct WatchSet {
    pub bindings: Vec<WatchBinding>,
    /// Project root; bindings match paths relative to it.
    pub root: PathBuf,
    /// Generated files never trigger reactions.
    pub output_dir: PathBuf,
}
