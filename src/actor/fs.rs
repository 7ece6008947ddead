//! FileSystem Actor
//!
//! Watches source directories and turns changes into task reactions.
//!
//! Architecture:
//! ```text
//! Watcher → Router (bindings) → TaskMsg::React
//! ```
//!
//! Every relevant event is routed as it arrives; there is no debounce
//! window, so two quick saves run the reaction twice.

use std::path::PathBuf;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use tokio::sync::mpsc;

use super::messages::TaskMsg;

// Watched pattern sets and their reactions.
mod binding;
// Event routing (raw events -> TaskMsg).
mod router;
// Watch root attach/re-attach lifecycle.
mod watch_roots;


pub use binding::{WatchBinding, WatchSet};
use router::events_to_messages;
use watch_roots::WatchRoots;

/// How often missing watch roots are re-checked.
const MAINTAIN_INTERVAL: Duration = Duration::from_secs(1);

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Watch-root consistency layer
    watch_roots: WatchRoots,
    /// Channel to send messages to TaskActor
    task_tx: mpsc::Sender<TaskMsg>,
    /// Bindings plus the root they are relative to
    set: WatchSet,
}

impl FsActor {
    /// Create a new FsActor.
    ///
    /// The watcher starts immediately; events buffer in the channel until
    /// [`FsActor::run`] is polled.
    pub fn new(
        roots: Vec<(PathBuf, RecursiveMode)>,
        task_tx: mpsc::Sender<TaskMsg>,
        set: WatchSet,
    ) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(roots);
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            task_tx,
            set,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let task_tx = self.task_tx;
        let set = self.set;
        let mut watcher = self.watcher;
        let mut watch_roots = self.watch_roots;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Bridge the blocking notify channel into tokio.
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        let mut maintain = tokio::time::interval(MAINTAIN_INTERVAL);

        loop {
            tokio::select! {
                biased;
                event = async_rx.recv() => {
                    let Some(event) = event else { break };
                    for msg in events_to_messages(&event, &set) {
                        if task_tx.send(msg).await.is_err() {
                            return; // TaskActor shut down
                        }
                    }
                }
                _ = maintain.tick() => watch_roots.maintain(&mut watcher),
            }
        }
    }
}
