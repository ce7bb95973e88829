use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::word_oracle::{OracleError, WordOracle};
use game_core::GameSession;

/// A session shared between the registry and the connection playing it.
pub type SharedSession = Arc<Mutex<GameSession>>;

#[derive(Clone)]
struct SessionEntry {
    created_on: NaiveDate,
    session: SharedSession,
}

/// Opaque session key → that player's session for today.
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
    oracle: Arc<dyn WordOracle>,
}

impl SessionRegistry {
    pub fn new(oracle: Arc<dyn WordOracle>) -> Self {
        Self {
            sessions: DashMap::new(),
            oracle,
        }
    }

    /// Today's session for `key`, creating it on first use.
    ///
    /// A session left over from an earlier day is replaced by a fresh one.
    /// Racing callers for the same key all get the session that landed in
    /// the map first.
    pub async fn get_or_create(
        &self,
        key: &str,
        today: NaiveDate,
    ) -> Result<SharedSession, OracleError> {
        if let Some(session) = self.current(key, today) {
            return Ok(session);
        }

        // No map guard may be held across the oracle call.
        let secret_word = self.oracle.todays_word(today).await?;
        let fresh = SessionEntry {
            created_on: today,
            session: Arc::new(Mutex::new(GameSession::new(&secret_word, today))),
        };

        let mut slot = self
            .sessions
            .entry(key.to_string())
            .or_insert_with(|| fresh.clone());
        if slot.created_on != today {
            tracing::info!("Replacing session {} from {}", key, slot.created_on);
            *slot = fresh;
        }

        Ok(slot.session.clone())
    }

    fn current(&self, key: &str, today: NaiveDate) -> Option<SharedSession> {
        self.sessions
            .get(key)
            .filter(|entry| entry.created_on == today)
            .map(|entry| entry.session.clone())
    }

    pub fn remove(&self, key: &str) -> bool {
        self.sessions.remove(key).is_some()
    }

    /// Drop every session drawn for a day other than `today`.
    pub fn evict_stale(&self, today: NaiveDate) -> usize {
        let mut evicted = 0;
        self.sessions.retain(|_, entry| {
            let keep = entry.created_on == today;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
