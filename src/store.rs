//! Document store for ledgers and learner profiles.
//!
//! Documents live in memory behind `RwLock`s. When a data directory is
//! configured, every save first rewrites a JSON snapshot (`ledgers.json`,
//! `learners.json`) through a temp file + rename and only then updates the
//! in-memory map; `open` reloads the snapshots.
//!
//! Ledger saves are compare-and-swap on `revision`: a save whose revision
//! does not match the stored one fails with `StoreError::Conflict` instead
//! of silently overwriting a concurrent writer. No retries happen here.
//! Learner updates are read-modify-write under the learners write lock.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::learner::Learner;
use crate::ledger::ProgressLedger;

const LEDGERS_FILE: &str = "ledgers.json";
const LEARNERS_FILE: &str = "learners.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("revision conflict for {user_id}/{language}: expected {expected}, stored {stored}")]
    Conflict {
        user_id: String,
        language: String,
        expected: u64,
        stored: u64,
    },
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding error: {0}")]
    Serde(#[from] serde_json::Error),
}

type LedgerKey = (String, String);

pub struct Store {
    ledgers: RwLock<HashMap<LedgerKey, ProgressLedger>>,
    learners: RwLock<HashMap<String, Learner>>,
    data_dir: Option<PathBuf>,
}

impl Store {
    pub fn in_memory() -> Self {
        Self {
            ledgers: RwLock::new(HashMap::new()),
            learners: RwLock::new(HashMap::new()),
            data_dir: None,
        }
    }

    /// Open a snapshot-backed store, loading any existing snapshot files.
    #[instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;

        let ledgers: Vec<ProgressLedger> = read_snapshot(&dir.join(LEDGERS_FILE)).await?;
        let learners: Vec<Learner> = read_snapshot(&dir.join(LEARNERS_FILE)).await?;
        info!(target: "store", ledgers = ledgers.len(), learners = learners.len(), "Loaded snapshot");

        Ok(Self {
            ledgers: RwLock::new(
                ledgers
                    .into_iter()
                    .map(|l| ((l.user_id.clone(), l.language.clone()), l))
                    .collect(),
            ),
            learners: RwLock::new(learners.into_iter().map(|l| (l.user_id.clone(), l)).collect()),
            data_dir: Some(dir),
        })
    }

    pub async fn load_ledger(&self, user_id: &str, language: &str) -> Option<ProgressLedger> {
        let key = (user_id.to_string(), language.to_string());
        self.ledgers.read().await.get(&key).cloned()
    }

    /// Persist a ledger if nobody saved it since it was loaded. Returns the
    /// stored copy with its bumped revision.
    ///
    /// The snapshot is written before the map entry is replaced, so a failed
    /// write leaves the previous revision in place.
    #[instrument(level = "debug", skip_all, fields(user_id = %ledger.user_id, language = %ledger.language, revision = ledger.revision))]
    pub async fn save_ledger(&self, mut ledger: ProgressLedger) -> Result<ProgressLedger, StoreError> {
        let mut ledgers = self.ledgers.write().await;
        let key = (ledger.user_id.clone(), ledger.language.clone());
        let stored = ledgers.get(&key).map(|l| l.revision).unwrap_or(0);
        if stored != ledger.revision {
            warn!(target: "store", user_id = %ledger.user_id, language = %ledger.language, expected = ledger.revision, stored, "Ledger revision conflict");
            return Err(StoreError::Conflict {
                user_id: ledger.user_id,
                language: ledger.language,
                expected: ledger.revision,
                stored,
            });
        }
        ledger.revision += 1;

        if let Some(dir) = &self.data_dir {
            let snapshot: Vec<&ProgressLedger> = ledgers
                .iter()
                .filter(|(k, _)| **k != key)
                .map(|(_, l)| l)
                .chain(std::iter::once(&ledger))
                .collect();
            if let Err(e) = write_snapshot(&dir.join(LEDGERS_FILE), &snapshot).await {
                warn!(target: "store", user_id = %ledger.user_id, language = %ledger.language, error = %e, "Ledger snapshot failed; save discarded");
                return Err(e);
            }
        }
        ledgers.insert(key, ledger.clone());
        Ok(ledger)
    }

    pub async fn ledgers_for_user(&self, user_id: &str) -> Vec<ProgressLedger> {
        let mut out: Vec<ProgressLedger> = self
            .ledgers
            .read()
            .await
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.language.cmp(&b.language));
        out
    }

    pub async fn load_learner(&self, user_id: &str) -> Option<Learner> {
        self.learners.read().await.get(user_id).cloned()
    }

    /// Apply `apply` to the learner (created on first use) while holding the
    /// write lock, so concurrent submissions in different languages cannot
    /// drop each other's XP. Nothing changes if the snapshot write fails.
    #[instrument(level = "debug", skip_all, fields(%user_id))]
    pub async fn update_learner<F>(&self, user_id: &str, apply: F) -> Result<Learner, StoreError>
    where
        F: FnOnce(&mut Learner),
    {
        let mut learners = self.learners.write().await;
        let mut learner = learners.get(user_id).cloned().unwrap_or_else(|| Learner::new(user_id));
        apply(&mut learner);
        learner.revision += 1;

        if let Some(dir) = &self.data_dir {
            let snapshot: Vec<&Learner> = learners
                .iter()
                .filter(|(k, _)| k.as_str() != user_id)
                .map(|(_, l)| l)
                .chain(std::iter::once(&learner))
                .collect();
            if let Err(e) = write_snapshot(&dir.join(LEARNERS_FILE), &snapshot).await {
                warn!(target: "store", %user_id, error = %e, "Learner snapshot failed; update discarded");
                return Err(e);
            }
        }
        learners.insert(user_id.to_string(), learner.clone());
        Ok(learner)
    }
}

async fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_snapshot<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(items)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
