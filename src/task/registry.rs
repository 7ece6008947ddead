//! Explicit task registry with series/parallel composition.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{TaskContext, TaskDef, TaskError, TaskReport};
use crate::log;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    Series,
    Parallel,
}

#[derive(Debug, Clone)]
pub enum TaskEntry {
    Leaf(TaskDef),
    Group { mode: GroupMode, members: Vec<String> },
    /// Remove a directory tree (relative to the project root).
    Clean { dir: PathBuf },
}

impl TaskEntry {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Leaf(_) => "task",
            Self::Group {
                mode: GroupMode::Series,
                ..
            } => "series",
            Self::Group {
                mode: GroupMode::Parallel,
                ..
            } => "parallel",
            Self::Clean { .. } => "clean",
        }
    }
}

/// Name → entry mapping, kept in registration order.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    entries: FxHashMap<String, TaskEntry>,
    order: Vec<String>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, name: String, entry: TaskEntry) -> Result<(), TaskError> {
        if self.entries.contains_key(&name) {
            return Err(TaskError::Duplicate(name));
        }
        self.order.push(name.clone());
        self.entries.insert(name, entry);
        Ok(())
    }

    pub fn register(&mut self, def: TaskDef) -> Result<(), TaskError> {
        self.insert(def.name.clone(), TaskEntry::Leaf(def))
    }

    pub fn register_group<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        mode: GroupMode,
        members: impl IntoIterator<Item = S>,
    ) -> Result<(), TaskError> {
        let members = members.into_iter().map(Into::into).collect();
        self.insert(name.into(), TaskEntry::Group { mode, members })
    }

    pub fn register_clean(
        &mut self,
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
    ) -> Result<(), TaskError> {
        self.insert(name.into(), TaskEntry::Clean { dir: dir.into() })
    }

    pub fn get(&self, name: &str) -> Option<&TaskEntry> {
        self.entries.get(name)
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Reject dangling group members and cyclic groups.
    pub fn validate(&self) -> Result<(), TaskError> {
        for name in &self.order {
            if let Some(TaskEntry::Group { members, .. }) = self.entries.get(name) {
                for member in members {
                    if !self.entries.contains_key(member) {
                        return Err(TaskError::UnknownMember {
                            group: name.clone(),
                            member: member.clone(),
                        });
                    }
                }
            }
        }

        let mut done = FxHashSet::default();
        for name in &self.order {
            let mut stack = Vec::new();
            self.visit(name, &mut stack, &mut done)?;
        }
        Ok(())
    }

    /// Depth-first walk; `stack` holds the current chain.
    fn visit<'a>(
        &'a self,
        name: &'a str,
        stack: &mut Vec<&'a str>,
        done: &mut FxHashSet<&'a str>,
    ) -> Result<(), TaskError> {
        if done.contains(name) {
            return Ok(());
        }
        if let Some(pos) = stack.iter().position(|n| *n == name) {
            let mut chain = stack[pos..].to_vec();
            chain.push(name);
            return Err(TaskError::Cycle(chain.join(" -> ")));
        }

        if let Some(TaskEntry::Group { members, .. }) = self.entries.get(name) {
            stack.push(name);
            for member in members {
                self.visit(member, stack, done)?;
            }
            stack.pop();
        }
        done.insert(name);
        Ok(())
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Run a task or group to completion.
    pub fn run(&self, name: &str, ctx: &TaskContext) -> Result<TaskReport, TaskError> {
        self.run_at(name, ctx, 0)
    }

    fn run_at(&self, name: &str, ctx: &TaskContext, depth: usize) -> Result<TaskReport, TaskError> {
        // Unvalidated registries may still contain cycles.
        if depth > self.order.len() {
            return Err(TaskError::Cycle(name.to_string()));
        }
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| TaskError::Unknown(name.to_string()))?;

        match entry {
            TaskEntry::Leaf(def) => def.run(ctx),
            TaskEntry::Clean { dir } => {
                let path = ctx.root.join(dir);
                match fs::remove_dir_all(&path) {
                    Ok(()) => log!("task"; "deleted {}", dir.display()),
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(source) => return Err(TaskError::Filesystem { path, source }),
                }
                Ok(TaskReport::default())
            }
            TaskEntry::Group {
                mode: GroupMode::Series,
                members,
            } => {
                let mut report = TaskReport::default();
                for member in members {
                    report.merge(self.run_at(member, ctx, depth + 1)?);
                }
                Ok(report)
            }
            TaskEntry::Group {
                mode: GroupMode::Parallel,
                members,
            } => {
                let results: Vec<_> = members
                    .par_iter()
                    .map(|member| (member, self.run_at(member, ctx, depth + 1)))
                    .collect();

                let mut report = TaskReport::default();
                let mut first_error = None;
                for (member, result) in results {
                    match result {
                        Ok(r) => report.merge(r),
                        Err(e) if first_error.is_none() => first_error = Some(e),
                        // the first error is reported by the caller
                        Err(e) => log!("error"; "`{}` failed: {}", member, e),
                    }
                }
                match first_error {
                    Some(e) => Err(e),
                    None => Ok(report),
                }
            }
        }
    }
}
