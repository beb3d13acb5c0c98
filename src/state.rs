//! Application state shared by every handler.
//!
//! This module owns:
//!   - the document store (ledgers + learner profiles)
//!   - the read-only exercise catalog
//!   - weekly goal targets for new ledgers
//!   - the UTC offset that defines the learner's calendar day

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{info, instrument};

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::ledger::GoalTargets;
use crate::store::{Store, StoreError};

pub struct AppState {
    pub store: Store,
    pub catalog: Catalog,
    pub goals: GoalTargets,
    pub utc_offset: FixedOffset,
}

impl AppState {
    /// Build state from config: open the store, index the catalog.
    #[instrument(level = "info", skip_all)]
    pub async fn new(config: AppConfig) -> Result<Self, StoreError> {
        let store = match &config.data_dir {
            Some(dir) => Store::open(dir).await?,
            None => {
                info!(target: "lingo_backend", "DATA_DIR not set; progress is kept in memory only.");
                Store::in_memory()
            }
        };
        let catalog = Catalog::new(config.file.speaking, config.file.listening);

        info!(target: "lingo_backend", goals = ?config.file.goals, utc_offset = %config.utc_offset, "State ready");
        Ok(Self {
            store,
            catalog,
            goals: config.file.goals,
            utc_offset: config.utc_offset,
        })
    }

    /// Current instant in the configured local offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.utc_offset)
    }
}
