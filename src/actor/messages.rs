//! Actor Message Definitions
//!
//! ```text
//! FsActor --React--> TaskActor --Reload--> WsActor
//! ```

use std::path::PathBuf;

// =============================================================================
// TaskActor Messages
// =============================================================================

/// Messages to Task Actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskMsg {
    /// Run a reaction for one changed file
    React {
        /// Task or group to run
        reaction: String,
        /// Broadcast a reload when the reaction completes
        notify: bool,
        /// Changed file (root-relative), for status output
        path: PathBuf,
    },
    /// Shutdown
    Shutdown,
}

// =============================================================================
// WsActor Messages
// =============================================================================

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Reload every connected page
    Reload { reason: String },
    /// Add client
    AddClient(std::net::TcpStream),
    /// Shutdown
    Shutdown,
}
