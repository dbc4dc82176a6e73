/// product-studio
///
/// A single-page browser tool for marketplace listings: upload a product
/// photo to get it letterboxed onto a 1000x1000 white JPEG canvas, and/or
/// type a product name to get two short AI-drafted descriptions.
/// Served by a synchronous tiny_http server; no JavaScript frameworks required.
///
/// Run with:
///   GEMINI_API_KEY=... cargo run --bin studio --release
/// Then open http://127.0.0.1:3001
///
/// Routes:
///   GET  /               — the form
///   POST /resize         — multipart form submission, JSON reply
///   GET  /download/{id}  — one-time JPEG download
///   GET  /healthz        — liveness probe

mod handlers;
mod render;
mod routes;
mod state;
mod util;

use std::process::ExitCode;
use std::time::Duration;

use tiny_http::Server;
use tracing::{error, info, warn};

use product_studio::service::spawn_housekeeping;
use product_studio::StudioConfig;

/// How often expired downloads and stale rate-limit windows are dropped.
const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(30);

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = StudioConfig::from_env();
    let addr = config.bind_addr();
    let server = match Server::http(&addr) {
        Ok(server) => server,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind HTTP server");
            return ExitCode::FAILURE;
        }
    };

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; descriptions will use the placeholder text");
    }

    let shared_state = state::build_state(&config);
    spawn_housekeeping(shared_state.clone(), HOUSEKEEPING_INTERVAL);

    info!(%addr, model = %config.gemini_model, "product studio listening on http://{}", addr);

    // Each request is dispatched on its own thread so a slow model call only
    // stalls the request that made it.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }

    ExitCode::SUCCESS
}
