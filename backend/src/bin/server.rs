//! OSM Parser HTTP Server Binary
//!
//! Loads configuration, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin osm-parser-server
//!
//! PARSER_CONFIG=parser.toml PORT=9000 cargo run --bin osm-parser-server
//! ```
//!
//! # Environment Variables
//!
//! - `PARSER_CONFIG`: Path to a TOML config file (default: `parser.toml` if present)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `PARSER_TEMP_DIR`, `PARSER_MAX_UPLOAD_MB`, `PARSER_OBJECT_TYPES`,
//!   `PARSER_FAILURE_POLICY`: see [`osm_parser_api::config`]
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use osm_parser_api::config::ServiceConfig;
use osm_parser_api::engine::OsmEngine;
use osm_parser_api::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting OSM parser server");

    let config = ServiceConfig::load()?;
    let addr: SocketAddr = config.bind_address().parse()?;
    let state = AppState::new(config, Arc::new(OsmEngine))?;
    info!(
        object_types = ?state.object_types.allowed(),
        failure_policy = %state.config.extraction.failure_policy,
        "configuration loaded"
    );

    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
