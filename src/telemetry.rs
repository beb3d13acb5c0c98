//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! - LOG_LEVEL controls the filter, e.g. "debug" or
//!   "info,progress=debug,store=debug,tower_http=info".
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Targets used in this crate: `lingo_backend` (startup, requests),
//! `progress` (ledger events such as level-ups, personal bests and weekly
//! resets) and `store` (snapshots, revision conflicts).

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,progress=debug,store=info,lingo_backend=debug,tower_http=info,axum=info";

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Returns false if one was already set
/// (for example by an embedding test harness).
pub fn init_tracing() -> bool {
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let installed = if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    if installed {
        tracing::debug!(target: "lingo_backend", json, "Tracing initialized");
    }
    installed
}
