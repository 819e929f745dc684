//! # gatelog-server
//!
//! HTTP server for the gatelog campus library entry/exit tracker.
//!
//! This binary provides:
//! - REST API for scan submission, student lookup, and log reporting
//! - WebSocket fan-out of accepted scans to live observers
//! - OpenAPI documentation at `/api/openapi.json`
//! - Structured logging to file and stdout
//!
//! ## Running
//!
//! ```bash
//! # Development
//! cargo run --package gatelog-server
//!
//! # Production
//! GATELOG_ENV=production ./gatelog-server
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use gatelog_core::GatelogConfig;
use gatelog_server::{api, logging, state::AppState};

/// Configuration file location, overridable via `GATELOG_CONFIG`.
fn config_path() -> PathBuf {
    std::env::var_os("GATELOG_CONFIG").map_or_else(
        || PathBuf::from("/etc/gatelog/config.toml"),
        PathBuf::from,
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("GATELOG_ENV").as_deref() == Ok("production");

    let config = GatelogConfig::load_or_default(&config_path())?;
    logging::init(&config, is_production)?;

    info!("Starting gatelog-server");

    let addr = SocketAddr::from((config.bind_address, config.port));
    let state = AppState::new(config)?;

    info!(
        students = state.roster().len(),
        events = state.event_log().len(),
        "state initialized"
    );

    // The scanning clients and dashboard are served from other origins
    let app = api::create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
