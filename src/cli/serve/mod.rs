//! Development server with live reload support.

mod content;
mod lifecycle;
mod path;
mod response;

pub use lifecycle::{spawn_actors, wait_for_shutdown};

use crate::{config::PipelineConfig, log};
use anyhow::{Context, Result};
use crossbeam::channel;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use tiny_http::{Request, Server};

/// Default WebSocket port for live reload
pub const DEFAULT_WS_PORT: u16 = 35729;

/// Worker threads answering HTTP requests.
const REQUEST_THREADS: usize = 4;

/// Actual WebSocket port (may differ from the configured one if it was in use).
/// `0` until either the server seeds it or the coordinator reports a bind.
static ACTUAL_WS_PORT: AtomicU16 = AtomicU16::new(0);

/// Update the actual WebSocket port (called by coordinator after binding)
pub fn set_actual_ws_port(port: u16) {
    ACTUAL_WS_PORT.store(port, Ordering::Relaxed);
}

/// Get the actual WebSocket port
fn get_actual_ws_port() -> u16 {
    load_ws_port(&ACTUAL_WS_PORT)
}

/// Store the configured port unless the coordinator already reported one.
fn seed_ws_port(slot: &AtomicU16, port: u16) {
    let _ = slot.compare_exchange(0, port, Ordering::Relaxed, Ordering::Relaxed);
}

fn load_ws_port(slot: &AtomicU16) -> u16 {
    match slot.load(Ordering::Relaxed) {
        0 => DEFAULT_WS_PORT,
        port => port,
    }
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    output_dir: PathBuf,
}

/// Bind the HTTP server without starting the request loop
///
/// The caller may start the watcher before or after this; requests are
/// only answered once [`BoundServer::run`] is entered.
pub fn bind_server(config: &PipelineConfig, shutdown_tx: channel::Sender<()>) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    // In dev the coordinator may have bound a fallback port already
    seed_ws_port(&ACTUAL_WS_PORT, config.serve.ws_port);

    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        output_dir: config.output_dir(),
    })
}

impl BoundServer {
    /// Run the request loop until the server is unblocked (blocking).
    pub fn run(self) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(REQUEST_THREADS)
            .build()
            .context("failed to create request thread pool")?;

        let output_dir = Arc::new(self.output_dir);
        for request in self.server.incoming_requests() {
            let output_dir = Arc::clone(&output_dir);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &output_dir) {
                    log!("serve"; "request error: {e}");
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, output_dir: &Path) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    // Served from memory with the port bound right now
    if request.url() == crate::embed::serve::HOTRELOAD_URL {
        return response::respond_hotreload_js(request, get_actual_ws_port());
    }

    if let Some(path) = path::resolve_path(request.url(), output_dir) {
        return response::respond_file(request, &path);
    }

    response::respond_not_found(request, output_dir)
}
