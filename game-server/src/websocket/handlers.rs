use std::sync::Arc;
use tracing::{error, info, warn};

use crate::game_manager::GameManager;
use crate::websocket::connection::PlayConnection;
use game_core::{GuessOutcome, is_well_formed_guess, normalize_guess};
use game_types::{GameError, ServerMessage, WordGuess};

/// Whether the Play stream keeps reading after a reply.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamControl {
    Continue,
    Stop,
    /// Stop after sending, then count the finished game.
    Finish(GuessOutcome),
}

/// A frame to send back and what to do afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub message: ServerMessage,
    pub control: StreamControl,
}

impl Reply {
    fn continue_with(message: ServerMessage) -> Self {
        Self {
            message,
            control: StreamControl::Continue,
        }
    }

    fn stop_with(message: ServerMessage) -> Self {
        Self {
            message,
            control: StreamControl::Stop,
        }
    }

    fn finish_with(message: ServerMessage, outcome: GuessOutcome) -> Self {
        Self {
            message,
            control: StreamControl::Finish(outcome),
        }
    }
}

#[derive(Clone)]
pub struct MessageHandler {
    connection: PlayConnection,
    game_manager: Arc<GameManager>,
}

impl MessageHandler {
    pub fn new(connection: PlayConnection, game_manager: Arc<GameManager>) -> Self {
        Self {
            connection,
            game_manager,
        }
    }

    pub fn connection(&self) -> &PlayConnection {
        &self.connection
    }

    /// Handle one text frame from the client.
    pub async fn handle_text(&self, text: &str) -> Reply {
        let guess: WordGuess = match serde_json::from_str(text) {
            Ok(guess) => guess,
            Err(e) => {
                warn!("Malformed frame from {}: {}", self.connection.id, e);
                return Reply::continue_with(ServerMessage::error(GameError::MalformedMessage {
                    reason: e.to_string(),
                }));
            }
        };

        self.handle_guess(guess).await
    }

    pub async fn handle_guess(&self, guess: WordGuess) -> Reply {
        if !is_well_formed_guess(&normalize_guess(&guess.word)) {
            return Reply::continue_with(ServerMessage::error(GameError::InvalidGuessLength {
                word: guess.word,
            }));
        }

        let outcome = match self
            .game_manager
            .submit_guess(&self.connection.session_key, &guess.word)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    "Word oracle failed for connection {}: {}",
                    self.connection.id, e
                );
                return Reply::stop_with(ServerMessage::error(GameError::ServiceUnavailable {
                    message: "The word service is unavailable, please try again later"
                        .to_string(),
                }));
            }
        };

        let message = ServerMessage::GuessResponse(outcome.to_response());

        if outcome.just_finished() {
            info!(
                "Session {} finished on connection {}",
                self.connection.session_key, self.connection.id
            );
            return Reply::finish_with(message, outcome);
        }

        if matches!(outcome, GuessOutcome::GameOver { .. }) {
            return Reply::stop_with(message);
        }

        Reply::continue_with(message)
    }

    /// Count a finished game once its reply has gone out.
    pub async fn record_completion(&self, outcome: &GuessOutcome) {
        self.game_manager.record_completion(outcome).await;
    }

    pub fn handle_disconnect(&self) {
        if self.connection.connection_scoped {
            self.game_manager.end_session(&self.connection.session_key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsAggregator;
    use crate::word_oracle::LocalWordOracle;
    use chrono::NaiveDate;
    use game_core::WordValidator;
    use game_persistence::{MemoryStatsStore, PersistenceError, StatsStore};
    use game_types::StatsRecord;
    use std::time::Duration;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 13).unwrap()
    }

    struct Fixture {
        handler: MessageHandler,
        game_manager: Arc<GameManager>,
        store: Arc<MemoryStatsStore>,
        secret: String,
        wrong: String,
    }

    fn fixture(session: Option<&str>) -> Fixture {
        let validator = WordValidator::new_with_test_words();
        let secret = validator.word_for_day(day()).unwrap();
        let wrong = ["crane", "slate"]
            .into_iter()
            .find(|w| *w != secret)
            .unwrap()
            .to_string();

        let store = Arc::new(MemoryStatsStore::new());
        let stats = Arc::new(StatsAggregator::new(store.clone(), Duration::from_secs(1)));
        let game_manager = Arc::new(
            GameManager::new(Arc::new(LocalWordOracle::new(validator)), stats)
                .with_clock(day),
        );
        let handler = MessageHandler::new(
            PlayConnection::new(session.map(str::to_string)),
            game_manager.clone(),
        );

        Fixture {
            handler,
            game_manager,
            store,
            secret,
            wrong,
        }
    }

    fn guess_frame(word: &str) -> String {
        serde_json::to_string(&WordGuess {
            word: word.to_string(),
        })
        .unwrap()
    }

    fn response(reply: &Reply) -> &game_types::WordGuessResponse {
        match &reply.message {
            ServerMessage::GuessResponse(response) => response,
            other => panic!("Expected a guess response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_frame_keeps_stream_open() {
        let f = fixture(None);

        let reply = f.handler.handle_text("{\"guess\": 5}").await;

        assert_eq!(reply.control, StreamControl::Continue);
        assert!(matches!(
            reply.message,
            ServerMessage::Error {
                error: GameError::MalformedMessage { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_wrong_length_is_rejected_before_session() {
        let f = fixture(None);

        let reply = f.handler.handle_text(&guess_frame("cat")).await;

        assert_eq!(reply.control, StreamControl::Continue);
        assert_eq!(
            reply.message,
            ServerMessage::error(GameError::InvalidGuessLength {
                word: "cat".to_string()
            })
        );
        assert!(f.game_manager.registry().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_guess_continues() {
        let f = fixture(None);

        let reply = f.handler.handle_text(&guess_frame(&f.wrong)).await;

        assert_eq!(reply.control, StreamControl::Continue);
        let response = response(&reply);
        assert!(response.valid_guess);
        assert!(!response.game_over);
        assert_eq!(response.correct_positions.len(), 5);
    }

    #[tokio::test]
    async fn test_win_stops_stream_and_records_once() {
        let f = fixture(Some("player-1"));

        let reply = f.handler.handle_text(&guess_frame(&f.secret)).await;
        assert!(response(&reply).is_correct);
        let StreamControl::Finish(outcome) = &reply.control else {
            panic!("Expected the win to finish the stream, got {:?}", reply.control);
        };
        assert!(outcome.just_finished());
        assert_eq!(f.store.save_count(), 0);

        f.handler.record_completion(outcome).await;
        assert_eq!(f.store.save_count(), 1);

        // Another guess on the same session is only echoed.
        let reply = f.handler.handle_text(&guess_frame(&f.wrong)).await;
        assert_eq!(reply.control, StreamControl::Stop);
        let echo = response(&reply);
        assert!(echo.game_over);
        assert!(!echo.valid_guess);
        assert_eq!(echo.correct_positions, "");
        assert_eq!(f.store.save_count(), 1);
    }

    struct SlowStore {
        inner: MemoryStatsStore,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl StatsStore for SlowStore {
        async fn load(&self) -> Result<Option<StatsRecord>, PersistenceError> {
            self.inner.load().await
        }

        async fn save(&self, record: &StatsRecord) -> Result<(), PersistenceError> {
            tokio::time::sleep(self.delay).await;
            self.inner.save(record).await
        }
    }

    #[tokio::test]
    async fn test_final_reply_does_not_wait_for_stats_save() {
        let validator = WordValidator::new_with_test_words();
        let secret = validator.word_for_day(day()).unwrap();
        let store = Arc::new(SlowStore {
            inner: MemoryStatsStore::new(),
            delay: Duration::from_secs(2),
        });
        let stats = Arc::new(StatsAggregator::new(store.clone(), Duration::from_secs(5)));
        let game_manager = Arc::new(
            GameManager::new(Arc::new(LocalWordOracle::new(validator)), stats).with_clock(day),
        );
        let handler = MessageHandler::new(PlayConnection::new(None), game_manager.clone());

        let reply = tokio::time::timeout(
            Duration::from_millis(500),
            handler.handle_text(&guess_frame(&secret)),
        )
        .await
        .expect("winning reply should not wait on the stats store");

        assert!(response(&reply).is_correct);
        assert!(matches!(reply.control, StreamControl::Finish(_)));
        assert_eq!(store.inner.save_count(), 0);

        if let StreamControl::Finish(outcome) = &reply.control {
            handler.record_completion(outcome).await;
        }
        assert_eq!(store.inner.save_count(), 1);
        assert_eq!(game_manager.get_stats().await.unwrap().winners, 1);
    }

    #[tokio::test]
    async fn test_disconnect_drops_connection_scoped_session() {
        let f = fixture(None);
        f.handler.handle_text(&guess_frame(&f.wrong)).await;
        assert_eq!(f.game_manager.registry().len(), 1);

        f.handler.handle_disconnect();
        assert!(f.game_manager.registry().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_keeps_keyed_session() {
        let f = fixture(Some("player-1"));
        f.handler.handle_text(&guess_frame(&f.wrong)).await;

        f.handler.handle_disconnect();
        assert_eq!(f.game_manager.registry().len(), 1);
    }
}
