use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use tungstenite::protocol::Message;

use super::{Clients, WsActor};
use crate::reload::message::HotReloadMessage;

/// Interval between non-blocking read sweeps.
const READ_POLL: Duration = Duration::from_millis(100);

impl WsActor {
    /// Add a new client connection
    pub(super) fn add_client(&self, stream: TcpStream) {
        // Keep blocking mode during handshake, switch to non-blocking after
        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                let _ = ws.get_ref().set_nonblocking(true);

                let connected_msg = HotReloadMessage::connected();
                if let Err(e) = ws.send(Message::Text(connected_msg.to_json().into())) {
                    crate::log!("ws"; "failed to send connected message: {}", e);
                    return;
                }

                let mut clients = self.clients.lock();
                crate::debug!("ws"; "client connected (total: {})", clients.len() + 1);
                clients.push(ws);
            }
            Err(e) => {
                crate::log!("ws"; "handshake failed: {}", e);
            }
        }
    }

    /// Background thread draining client frames.
    ///
    /// Clients never send anything meaningful; reading answers pings and
    /// notices closed connections. Exits once the actor is gone.
    pub(super) fn client_reader_loop(clients: Clients) {
        while Arc::strong_count(&clients) > 1 {
            std::thread::sleep(READ_POLL);

            clients.lock().retain_mut(|ws| match ws.read() {
                Ok(Message::Close(_)) => false,
                Ok(_) => true,
                Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    true
                }
                Err(e) => {
                    crate::debug!("ws"; "client disconnected: {}", e);
                    false
                }
            });
        }
    }
}
