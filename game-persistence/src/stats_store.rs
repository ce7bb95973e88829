use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::PersistenceError;
use game_types::StatsRecord;

/// Durable home for the single daily statistics record.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<StatsRecord>, PersistenceError>;

    /// Replace the stored record.
    async fn save(&self, record: &StatsRecord) -> Result<(), PersistenceError>;
}

/// In-process store for tests and ephemeral servers.
///
/// Counts saves and can be told to fail, which lets callers check how
/// storage errors are handled.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    record: Mutex<Option<StatsRecord>>,
    saves: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: StatsRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn stored(&self) -> Option<StatsRecord> {
        self.record.lock().await.clone()
    }

    fn check_failing(&self) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Storage(anyhow::anyhow!(
                "memory store set to fail"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn load(&self) -> Result<Option<StatsRecord>, PersistenceError> {
        self.check_failing()?;
        Ok(self.record.lock().await.clone())
    }

    async fn save(&self, record: &StatsRecord) -> Result<(), PersistenceError> {
        self.check_failing()?;
        *self.record.lock().await = Some(record.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
