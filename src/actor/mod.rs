//! Actor System for Watch and Live Reload
//!
//! Message-passing concurrency for the watch phase:
//!
//! ```text
//! FsActor --> TaskActor --> WsActor
//! (watch)     (reactions)   (broadcast)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher and binding matcher
//! - `task` - Runs watch reactions on blocking workers
//! - `ws` - WebSocket broadcast
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod task;
pub mod ws;

pub use coordinator::Coordinator;
