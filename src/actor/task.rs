//! Task Actor
//!
//! Runs watch reactions. Each reaction gets its own blocking worker, so a
//! slow image pass never delays a stylesheet rebuild and a failed reaction
//! never stops the watcher.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::messages::{TaskMsg, WsMsg};
use crate::logger::{status_error, status_success};
use crate::task::{TaskContext, TaskError, TaskRegistry};
use crate::utils::path::to_slash;

#[derive(Debug, Error)]
pub enum WatchReactionError {
    #[error("`{reaction}` failed: {source}")]
    Task {
        reaction: String,
        #[source]
        source: TaskError,
    },

    #[error("`{reaction}` worker stopped: {message}")]
    Worker { reaction: String, message: String },
}

/// Result of one reaction, returned by the spawned task.
#[derive(Debug)]
pub enum ReactionOutcome {
    Completed { written: usize },
    Failed(WatchReactionError),
}

pub struct TaskActor {
    rx: mpsc::Receiver<TaskMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    registry: Arc<TaskRegistry>,
    ctx: Arc<TaskContext>,
}

impl TaskActor {
    pub fn new(
        rx: mpsc::Receiver<TaskMsg>,
        ws_tx: mpsc::Sender<WsMsg>,
        registry: Arc<TaskRegistry>,
        ctx: Arc<TaskContext>,
    ) -> Self {
        Self {
            rx,
            ws_tx,
            registry,
            ctx,
        }
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                TaskMsg::React {
                    reaction,
                    notify,
                    path,
                } => {
                    // Fire and forget: outcomes are reported on the terminal.
                    drop(self.react(reaction, notify, path));
                }
                TaskMsg::Shutdown => break,
            }
        }
    }

    /// Start one reaction without waiting for it.
    fn react(&self, reaction: String, notify: bool, path: PathBuf) -> JoinHandle<ReactionOutcome> {
        let registry = Arc::clone(&self.registry);
        let ctx = Arc::clone(&self.ctx);
        let ws_tx = self.ws_tx.clone();

        tokio::spawn(async move {
            let label = format!("{} ({})", reaction, to_slash(&path));
            let name = reaction.clone();
            let result = tokio::task::spawn_blocking(move || registry.run(&name, &ctx)).await;

            let outcome = match result {
                Ok(Ok(report)) => ReactionOutcome::Completed {
                    written: report.written.len(),
                },
                Ok(Err(source)) => {
                    ReactionOutcome::Failed(WatchReactionError::Task { reaction, source })
                }
                Err(e) => ReactionOutcome::Failed(WatchReactionError::Worker {
                    reaction,
                    message: e.to_string(),
                }),
            };

            match &outcome {
                ReactionOutcome::Completed { .. } => {
                    status_success(&label);
                    if notify {
                        let _ = ws_tx.send(WsMsg::Reload { reason: label }).await;
                    }
                }
                ReactionOutcome::Failed(e) => status_error(&label, &e.to_string()),
            }
            outcome
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{GroupMode, TaskDef};
    use crate::transform::TransformSettings;
    use std::fs;
    use tempfile::TempDir;

    fn make_actor(root: &std::path::Path) -> (TaskActor, mpsc::Receiver<WsMsg>) {
        let mut registry = TaskRegistry::new();
        registry
            .register(TaskDef::new(
                "copy-html",
                vec!["./*.html".into()],
                "build",
            ))
            .unwrap();
        registry
            .register(TaskDef::new(
                "copy-missing",
                vec!["./missing.txt".into()],
                "build",
            ))
            .unwrap();
        registry
            .register_group("both", GroupMode::Parallel, ["copy-html", "copy-missing"])
            .unwrap();

        let ctx = TaskContext {
            root: root.to_path_buf(),
            settings: TransformSettings::default(),
        };
        let (_task_tx, task_rx) = mpsc::channel(8);
        let (ws_tx, ws_rx) = mpsc::channel(8);
        (
            TaskActor::new(task_rx, ws_tx, Arc::new(registry), Arc::new(ctx)),
            ws_rx,
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_each_reaction_reloads() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<p>hi</p>").unwrap();
        let (actor, mut ws_rx) = make_actor(dir.path());

        let first = actor.react("copy-html".into(), true, "index.html".into());
        let second = actor.react("copy-html".into(), true, "index.html".into());
        for handle in [first, second] {
            assert!(matches!(
                handle.await.unwrap(),
                ReactionOutcome::Completed { written: 1 }
            ));
        }

        for _ in 0..2 {
            match ws_rx.recv().await {
                Some(WsMsg::Reload { reason }) => assert_eq!(reason, "copy-html (index.html)"),
                other => panic!("expected reload, got {other:?}"),
            }
        }
        assert!(dir.path().join("build/index.html").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_silent_reaction_does_not_reload() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<p>hi</p>").unwrap();
        let (actor, mut ws_rx) = make_actor(dir.path());

        let outcome = actor
            .react("copy-html".into(), false, "index.html".into())
            .await
            .unwrap();
        assert!(matches!(outcome, ReactionOutcome::Completed { .. }));
        drop(actor);
        assert!(ws_rx.recv().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_reaction_reported_without_reload() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<p>hi</p>").unwrap();
        let (actor, mut ws_rx) = make_actor(dir.path());

        let outcome = actor
            .react("both".into(), true, "missing.txt".into())
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            ReactionOutcome::Failed(WatchReactionError::Task {
                source: TaskError::MissingInput(_),
                ..
            })
        ));
        // the healthy member still ran
        assert!(dir.path().join("build/index.html").exists());
        drop(actor);
        assert!(ws_rx.recv().await.is_none());
    }
}
