use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::session_registry::SessionRegistry;
use crate::stats::{StatsAggregator, StatsError};
use crate::word_oracle::{OracleError, WordOracle};
use game_core::{GuessOutcome, normalize_guess};
use game_types::{GameOutcome, GameStatistics};

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Ties the session registry, the word oracle and the stats aggregator
/// together for the connection handlers.
pub struct GameManager {
    registry: SessionRegistry,
    oracle: Arc<dyn WordOracle>,
    stats: Arc<StatsAggregator>,
    clock: Clock,
}

impl GameManager {
    pub fn new(oracle: Arc<dyn WordOracle>, stats: Arc<StatsAggregator>) -> Self {
        Self {
            registry: SessionRegistry::new(oracle.clone()),
            oracle,
            stats,
            clock: Arc::new(|| chrono::Local::now().date_naive()),
        }
    }

    /// Replace the source of "today".
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Play one guess in the session stored under `session_key`.
    ///
    /// The session stays locked while the oracle is consulted, so guesses
    /// within one session are applied strictly in order.
    pub async fn submit_guess(
        &self,
        session_key: &str,
        raw_guess: &str,
    ) -> Result<GuessOutcome, OracleError> {
        let today = self.today();
        let session = self.registry.get_or_create(session_key, today).await?;
        let mut session = session.lock().await;

        if session.is_terminal() {
            debug!("Session {} already finished, echoing", session_key);
            return Ok(session.terminal_echo(raw_guess));
        }

        let is_valid_word = self.oracle.validate_word(&normalize_guess(raw_guess)).await?;
        Ok(session.submit_guess(raw_guess, is_valid_word))
    }

    /// Feed a finished session into the daily stats.
    ///
    /// Only outcomes flagged `just_finished` are counted. Stats failures are
    /// logged and swallowed; the player's result never depends on them.
    pub async fn record_completion(&self, outcome: &GuessOutcome) {
        let GuessOutcome::Scored {
            outcome: result,
            guess_count,
            just_finished: true,
            ..
        } = outcome
        else {
            return;
        };

        let day = self.today();
        let won = *result == GameOutcome::Won;
        match self.stats.record_completion(day, won, *guess_count).await {
            Ok(()) => info!(
                "Recorded {} in {} guesses for {}",
                if won { "win" } else { "loss" },
                guess_count,
                day
            ),
            Err(StatsError::LockTimeout(waited)) => {
                warn!("Stats lock not acquired within {:?}, skipping update", waited)
            }
            Err(e) => warn!("Stats update failed: {}", e),
        }
    }

    pub async fn get_stats(&self) -> Result<GameStatistics, StatsError> {
        self.stats.snapshot(self.today()).await
    }

    /// Forget a session whose connection has gone away.
    pub fn end_session(&self, session_key: &str) {
        if self.registry.remove(session_key) {
            debug!("Removed session {}", session_key);
        }
    }

    pub fn cleanup_stale_sessions(&self) -> usize {
        let evicted = self.registry.evict_stale(self.today());
        if evicted > 0 {
            info!("Evicted {} stale sessions", evicted);
        }
        evicted
    }
}
