//! Actor Coordinator - Wires up the Watch/Reload Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Binds the live-reload socket
//! - Runs the actors until shutdown

mod runtime;
mod watch_paths;

use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::{FsActor, WatchSet};
use super::messages::{TaskMsg, WsMsg};
use super::task::TaskActor;
use super::ws::WsActor;
use crate::task::{TaskContext, TaskRegistry};

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    set: WatchSet,
    registry: Arc<TaskRegistry>,
    ctx: Arc<TaskContext>,
    ws_port: Option<u16>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(set: WatchSet, registry: Arc<TaskRegistry>, ctx: Arc<TaskContext>) -> Self {
        Self {
            set,
            registry,
            ctx,
            ws_port: None,
            shutdown_rx: None,
        }
    }

    /// Set WebSocket port.
    pub fn with_ws_port(mut self, port: u16) -> Self {
        self.ws_port = Some(port);
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(mut self) -> Result<()> {
        let (task_tx, task_rx) = mpsc::channel::<TaskMsg>(CHANNEL_BUFFER);
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        if let Some(port) = self.ws_port {
            match crate::reload::server::start_ws_server_with_channel(port, ws_tx.clone()) {
                Ok(actual_port) => {
                    if actual_port != port {
                        crate::log!("watch"; "port {} in use, live reload on {}", port, actual_port);
                    }
                    crate::cli::serve::set_actual_ws_port(actual_port);
                }
                Err(e) => {
                    crate::log!("actor"; "websocket server failed: {}", e);
                }
            }
        }

        let watch_paths = watch_paths::collect_watch_paths(&self.set);
        for (path, mode) in &watch_paths {
            crate::debug!("watch"; "{} ({:?})", path.display(), mode);
        }
        crate::log!("watch"; "watching {} bindings", self.set.bindings.len());

        let fs_actor = FsActor::new(watch_paths, task_tx.clone(), self.set)
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
        let task_actor = TaskActor::new(task_rx, ws_tx.clone(), self.registry, self.ctx);
        let ws_actor = WsActor::new(ws_rx);

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        runtime::run_actors(fs_actor, task_actor, ws_actor, task_tx, ws_tx, shutdown_rx).await;

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
