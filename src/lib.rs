//! Lingo · language-learning progress backend
//!
//! - Axum HTTP API over per-user, per-language progress ledgers
//! - Attempt recording (lesson, speaking, listening, vocabulary), skill XP
//!   and levels, daily/weekly rollups, derived statistics
//! - Read-only exercise catalog (built-in seeds + optional TOML bank)
//! - In-memory document store with optional JSON snapshots

pub mod catalog;
pub mod config;
pub mod domain;
pub mod learner;
pub mod ledger;
pub mod logic;
pub mod protocol;
pub mod response;
pub mod rewards;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;

use crate::config::AppConfig;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::StoreError;

/// Build shared state and the router from a config.
pub async fn create_app(config: AppConfig) -> Result<Router, StoreError> {
    let state = Arc::new(AppState::new(config).await?);
    Ok(build_router(state))
}
