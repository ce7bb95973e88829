#![allow(dead_code)]

use chrono::NaiveDate;
use game_core::{GameSession, GuessOutcome, WordValidator};

/// Creates a test WordValidator with a known set of words
pub fn create_test_validator() -> WordValidator {
    let word_list = "allot\napple\ncrane\neerie\nhello\nhouse\nlolly\nmouse\nplane\n\
                     slate\nspeed\nstone\ntests\ntrain\nwater\nworld";
    WordValidator::new(word_list)
}

pub fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 13).unwrap()
}

/// Creates a session for a known secret word on the test day
pub fn create_session(secret: &str) -> GameSession {
    GameSession::new(secret, test_day())
}

/// Submits a guess the way the server does: dictionary lookup first, then the
/// session applies it.
pub fn play(session: &mut GameSession, validator: &WordValidator, guess: &str) -> GuessOutcome {
    let is_valid = validator.is_valid_word(guess);
    session.submit_guess(guess, is_valid)
}

/// Plays a list of guesses and returns the outcome of each one
pub fn play_all(
    session: &mut GameSession,
    validator: &WordValidator,
    guesses: &[&str],
) -> Vec<GuessOutcome> {
    guesses
        .iter()
        .map(|guess| play(session, validator, guess))
        .collect()
}
