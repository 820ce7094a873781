//! `tc3-rewards` storefront entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise telemetry (JSON logs, optional OTLP spans).
//! 3. Compile templates and build the session layer settings.
//! 4. Start identity provider discovery in the background.
//! 5. Build the Axum router.
//! 6. Bind the listener once the identity integration reports ready.

mod config;
mod identity;
mod render;
mod server;
mod session;
mod telemetry;

use anyhow::Result;
use tracing::info;

use config::Config;
use identity::{IdentityState, Provider};
use render::Renderer;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        app_port = cfg.app_port,
        "tc3-rewards starting"
    );

    // -----------------------------------------------------------------------
    // 3. Templates and sessions
    // -----------------------------------------------------------------------
    let renderer = Renderer::new()?;
    let sessions = cfg.session()?;

    // -----------------------------------------------------------------------
    // 4. Identity provider discovery
    // -----------------------------------------------------------------------
    let (lifecycle, signals) = identity::lifecycle::channel();
    let _error_log = signals.errors.log_in_background();
    let provider = Provider::new();
    let _discovery = identity::start(cfg.identity()?, provider.clone(), lifecycle.clone());

    // -----------------------------------------------------------------------
    // 5. Router
    // -----------------------------------------------------------------------
    let state = AppState::new(renderer, IdentityState { provider, lifecycle });
    let router = server::router::build(state, &sessions, &cfg.static_dir());

    // -----------------------------------------------------------------------
    // 6. HTTP server
    // -----------------------------------------------------------------------
    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.app_port).into();
    info!(addr = %addr, "waiting for identity provider before listening");
    server::listener::serve_when_ready(signals.ready, addr, router).await
}
