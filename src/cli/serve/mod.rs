//! Image byte-serving endpoint.
//!
//! Serves content images at `GET /api/<type>/<path...>` with a long-lived
//! immutable cache directive. Traversal and disallowed extensions are
//! `403`, unknown paths `404`.

mod lifecycle;
mod path;
mod response;

use std::sync::Arc;

use anyhow::{Result, anyhow};
use tiny_http::{Request, Server};

use crate::config::SiteConfig;
use crate::{debug, log};

/// Bind, then handle requests until Ctrl+C.
pub fn serve(config: &SiteConfig) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::install_shutdown_handler(Arc::clone(&server))?;

    log!("serve"; "http://{}{}", addr, path::API_PREFIX);
    run_request_loop(&server, config)
}

fn run_request_loop(server: &Server, config: &SiteConfig) -> Result<()> {
    // Requests are independent; a small pool keeps slow reads from queueing others
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .map_err(|e| anyhow!("failed to create thread pool: {e}"))?;

    pool.scope(|scope| {
        for request in server.incoming_requests() {
            scope.spawn(move |_| {
                if let Err(e) = handle_request(request, config) {
                    log!("serve"; "request error: {e:#}");
                }
            });
        }
    });
    Ok(())
}

/// Handle a single HTTP request.
fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    if lifecycle::is_shutdown() {
        return response::respond_unavailable(request);
    }
    if !response::is_routable(request.method()) {
        return response::respond_method_not_allowed(request);
    }

    match path::resolve(request.url(), config) {
        Ok(file) => response::respond_file(request, &file, &config.serve.cache_control),
        Err(e) => {
            debug!("serve"; "{} {}: {}", response::status_for(&e), request.url(), e);
            response::respond_error(request, &e)
        }
    }
}
