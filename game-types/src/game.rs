use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Number of letters in every secret word and every accepted guess.
pub const WORD_LENGTH: usize = 5;

/// Accepted guesses allowed before a session is lost.
pub const MAX_GUESSES: u32 = 6;

/// Per-position feedback for a scored guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LetterStatus {
    Exact,   // right letter, right position
    Partial, // in the word, somewhere else
    Absent,  // not in the word, or every copy already matched
}

impl LetterStatus {
    /// Symbol used in the `correctPositions` wire string.
    pub fn symbol(self) -> char {
        match self {
            LetterStatus::Exact => '*',
            LetterStatus::Partial => '?',
            LetterStatus::Absent => 'x',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameOutcome {
    InProgress,
    Won,
    Lost,
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

/// A single guess sent by the client on the Play stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordGuess {
    pub word: String,
}

/// Server reply to one guess.
///
/// Letter sets are comma-joined and sorted. `correct_positions` uses
/// `*` exact, `?` partial and `x` absent, and is empty for invalid words
/// and for replies to a session that has already finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WordGuessResponse {
    pub word: String,
    pub is_correct: bool,
    pub game_over: bool,
    pub valid_guess: bool,
    pub correct_positions: String,
    pub included_letters: String,
    pub excluded_letters: String,
    pub remaining_letters: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_status_symbols() {
        assert_eq!(LetterStatus::Exact.symbol(), '*');
        assert_eq!(LetterStatus::Partial.symbol(), '?');
        assert_eq!(LetterStatus::Absent.symbol(), 'x');
    }

    #[test]
    fn test_response_uses_camel_case_fields() {
        let response = WordGuessResponse {
            word: "crane".to_string(),
            is_correct: false,
            game_over: false,
            valid_guess: true,
            correct_positions: "*?xxx".to_string(),
            included_letters: "c,r".to_string(),
            excluded_letters: "a,e,n".to_string(),
            remaining_letters: "b,d".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["isCorrect"], false);
        assert_eq!(json["validGuess"], true);
        assert_eq!(json["correctPositions"], "*?xxx");
        assert_eq!(json["includedLetters"], "c,r");
        assert_eq!(json["excludedLetters"], "a,e,n");
        assert_eq!(json["remainingLetters"], "b,d");
    }

    #[test]
    fn test_outcome_terminal() {
        assert!(!GameOutcome::InProgress.is_terminal());
        assert!(GameOutcome::Won.is_terminal());
        assert!(GameOutcome::Lost.is_terminal());
    }
}
