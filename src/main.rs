//! Lingo · progress backend server
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   APP_CONFIG_PATH    : path to TOML config (weekly goals + catalog bank)
//!   DATA_DIR           : directory for JSON snapshots (in-memory only if unset)
//!   UTC_OFFSET_MINUTES : offset defining the learner's calendar day (default 0)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use lingo_backend::config::AppConfig;
use lingo_backend::{create_app, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let config = AppConfig::from_env();
  let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

  // Shared state (store, catalog, goals) + router with CORS and tracing layers.
  let app = create_app(config).await?;

  let listener = TcpListener::bind(addr).await?;
  info!(target: "lingo_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "lingo_backend", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "lingo_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "lingo_backend", "Shutdown signal received");
}
