//! Reload Module
//!
//! WebSocket-based live reload for the dev server.
//!
//! ```text
//! TaskActor -> WsActor -> Browser
//! (reaction)  (broadcast)
//! ```
//!
//! - `message` - Hot reload message types
//! - `server` - WebSocket listener handing clients to the actor

pub mod message;
pub mod server;
