//! WebSocket Actor
//!
//! Owns every live-reload connection and pushes reload messages to them.
//!
//! ```text
//! TaskActor --[Reload]--> WsActor --[broadcast]--> Clients
//! listener  --[AddClient]--^
//! ```

mod client_io;
mod delivery;

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::messages::WsMsg;
use crate::reload::message::HotReloadMessage;

type Clients = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    /// Channel to receive messages
    rx: mpsc::Receiver<WsMsg>,
    /// Connected clients (shared for broadcast + read thread)
    clients: Clients,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let clients_for_reader = Arc::clone(&self.clients);
        std::thread::spawn(move || {
            Self::client_reader_loop(clients_for_reader);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Reload { reason } => {
                    crate::debug!("ws"; "sending reload: {}", reason);
                    let hr_msg = HotReloadMessage::reload(&reason);
                    self.broadcast(Message::Text(hr_msg.to_json().into()));
                }
                WsMsg::AddClient(stream) => self.add_client(stream),
                WsMsg::Shutdown => {
                    crate::debug!("ws"; "shutting down");
                    let mut clients = self.clients.lock();
                    for mut ws in clients.drain(..) {
                        let _ = ws.close(None);
                    }
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn read_text(socket: &mut WebSocket<impl std::io::Read + std::io::Write>) -> HotReloadMessage {
        loop {
            match socket.read().unwrap() {
                Message::Text(text) => return HotReloadMessage::from_json(&text).unwrap(),
                Message::Ping(_) | Message::Pong(_) => continue,
                other => panic!("unexpected frame: {other:?}"),
            }
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_client_receives_connected_then_reload() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel(8);
        let actor = tokio::spawn(WsActor::new(rx).run());

        let client = std::thread::spawn(move || {
            let (mut socket, _) = tungstenite::connect(format!("ws://127.0.0.1:{port}")).unwrap();
            let first = read_text(&mut socket);
            let second = read_text(&mut socket);
            (first, second)
        });

        let (stream, _) = listener.accept().unwrap();
        tx.send(WsMsg::AddClient(stream)).await.unwrap();
        tx.send(WsMsg::Reload {
            reason: "compile-js (src/js/app.js)".into(),
        })
        .await
        .unwrap();

        let (first, second) = tokio::task::spawn_blocking(move || client.join().unwrap())
            .await
            .unwrap();
        assert!(matches!(first, HotReloadMessage::Connected { .. }));
        assert_eq!(
            second,
            HotReloadMessage::Reload {
                reason: Some("compile-js (src/js/app.js)".into())
            }
        );

        tx.send(WsMsg::Shutdown).await.unwrap();
        actor.await.unwrap();
    }

    #[tokio::test]
    async fn test_broadcast_without_clients_is_noop() {
        let (tx, rx) = mpsc::channel(8);
        let actor = tokio::spawn(WsActor::new(rx).run());
        tx.send(WsMsg::Reload {
            reason: "minify-html (index.html)".into(),
        })
        .await
        .unwrap();
        tx.send(WsMsg::Shutdown).await.unwrap();
        actor.await.unwrap();
    }
}
