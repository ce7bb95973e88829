use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use game_core::DailyStats;
use game_persistence::{PersistenceError, StatsStore};
use game_types::GameStatistics;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("timed out after {0:?} waiting for the stats lock")]
    LockTimeout(Duration),
    #[error("failed to persist stats: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Process-wide daily counters.
///
/// Every read and every read-modify-persist sequence runs inside one
/// critical section. The stored record is loaded on first use.
pub struct StatsAggregator {
    store: Arc<dyn StatsStore>,
    state: Mutex<Option<DailyStats>>,
    lock_timeout: Duration,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn StatsStore>, lock_timeout: Duration) -> Self {
        Self {
            store,
            state: Mutex::new(None),
            lock_timeout,
        }
    }

    /// Count one finished session for `day`.
    pub async fn record_completion(
        &self,
        day: NaiveDate,
        won: bool,
        guess_count: u32,
    ) -> Result<(), StatsError> {
        let mut guard = self.lock().await?;
        let stats = self.loaded(&mut guard, day).await;

        stats.record_completion(day, won, guess_count);
        self.store.save(&stats.to_record()).await?;

        tracing::debug!(
            "Recorded completion for {}: players={} winners={}",
            day,
            stats.players_today,
            stats.winners_today
        );
        Ok(())
    }

    pub async fn snapshot(&self, today: NaiveDate) -> Result<GameStatistics, StatsError> {
        let mut guard = self.lock().await?;
        Ok(self.loaded(&mut guard, today).await.snapshot(today))
    }

    async fn lock(&self) -> Result<MutexGuard<'_, Option<DailyStats>>, StatsError> {
        tokio::time::timeout(self.lock_timeout, self.state.lock())
            .await
            .map_err(|_| StatsError::LockTimeout(self.lock_timeout))
    }

    async fn loaded<'a>(
        &self,
        slot: &'a mut Option<DailyStats>,
        today: NaiveDate,
    ) -> &'a mut DailyStats {
        if slot.is_none() {
            *slot = Some(self.read_store(today).await);
        }
        slot.get_or_insert_with(|| DailyStats::new(today))
    }

    /// Anything unusable in storage counts as a fresh day.
    async fn read_store(&self, today: NaiveDate) -> DailyStats {
        match self.store.load().await {
            Ok(Some(record)) => match DailyStats::from_record(&record) {
                Ok(stats) => {
                    tracing::info!(
                        "Loaded stats for {} ({} players)",
                        stats.current_day,
                        stats.players_today
                    );
                    stats
                }
                Err(e) => {
                    tracing::warn!("Discarding corrupt stats record: {}", e);
                    DailyStats::new(today)
                }
            },
            Ok(None) => {
                tracing::info!("No stored stats, starting from zero");
                DailyStats::new(today)
            }
            Err(e) => {
                tracing::warn!("Could not load stats, starting from zero: {}", e);
                DailyStats::new(today)
            }
        }
    }
}
