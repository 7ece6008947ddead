use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::messages::{TaskMsg, WsMsg};
use crate::actor::task::TaskActor;
use crate::actor::ws::WsActor;

const SHUTDOWN_POLL: Duration = Duration::from_millis(100);
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Run all actors concurrently until shutdown or until one of them stops.
pub(super) async fn run_actors(
    fs: FsActor,
    task: TaskActor,
    ws: WsActor,
    task_tx: mpsc::Sender<TaskMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let mut fs_handle = tokio::spawn(fs.run());
    let mut task_handle = tokio::spawn(task.run());
    let mut ws_handle = tokio::spawn(ws.run());

    let wait_signal = async {
        match shutdown_rx {
            Some(rx) => loop {
                if rx.try_recv().is_ok() {
                    crate::debug!("actor"; "shutdown signal received");
                    break;
                }
                tokio::time::sleep(SHUTDOWN_POLL).await;
            },
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = wait_signal => {}
        _ = &mut fs_handle => {}
        _ = &mut task_handle => {}
        _ = &mut ws_handle => {}
    }

    crate::debug!("actor"; "sending shutdown");
    let _ = task_tx.send(TaskMsg::Shutdown).await;
    let _ = ws_tx.send(WsMsg::Shutdown).await;
    fs_handle.abort();

    let _ = tokio::time::timeout(SHUTDOWN_GRACE, async {
        for handle in [task_handle, ws_handle] {
            // a handle that won the select has already been consumed
            if !handle.is_finished() {
                let _ = handle.await;
            }
        }
    })
    .await;
}
