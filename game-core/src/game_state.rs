use chrono::NaiveDate;
use game_types::{GameOutcome, MAX_GUESSES, WORD_LENGTH, WordGuessResponse};
use std::collections::BTreeSet;

use crate::{GuessScore, ScoringEngine};

/// Lowercase a raw guess and strip surrounding whitespace.
pub fn normalize_guess(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// True when `word` is exactly five ASCII letters.
pub fn is_well_formed_guess(word: &str) -> bool {
    word.chars().count() == WORD_LENGTH && word.chars().all(|c| c.is_ascii_alphabetic())
}

fn alphabet() -> BTreeSet<char> {
    ('a'..='z').collect()
}

fn join_letters<'a>(letters: impl IntoIterator<Item = &'a char>) -> String {
    letters
        .into_iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Letter knowledge carried on every reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterSnapshot {
    pub included: BTreeSet<char>,
    pub excluded: BTreeSet<char>,
    pub remaining: BTreeSet<char>,
}

/// Result of submitting one guess to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    /// The session had already finished; nothing was scored.
    GameOver {
        word: String,
        won: bool,
        letters: LetterSnapshot,
    },
    /// Not a dictionary word. The attempt is not counted.
    InvalidWord {
        word: String,
        remaining: BTreeSet<char>,
    },
    Scored {
        word: String,
        score: GuessScore,
        outcome: GameOutcome,
        guess_count: u32,
        /// Set only on the guess that moved the session into Won or Lost.
        just_finished: bool,
        remaining: BTreeSet<char>,
    },
}

impl GuessOutcome {
    pub fn just_finished(&self) -> bool {
        matches!(self, GuessOutcome::Scored { just_finished: true, .. })
    }

    pub fn to_response(&self) -> WordGuessResponse {
        match self {
            GuessOutcome::GameOver { word, won, letters } => WordGuessResponse {
                word: word.clone(),
                is_correct: *won,
                game_over: true,
                valid_guess: false,
                correct_positions: String::new(),
                included_letters: join_letters(&letters.included),
                excluded_letters: join_letters(&letters.excluded),
                remaining_letters: join_letters(&letters.remaining),
            },
            GuessOutcome::InvalidWord { word, remaining } => WordGuessResponse {
                word: word.clone(),
                is_correct: false,
                game_over: false,
                valid_guess: false,
                correct_positions: String::new(),
                included_letters: String::new(),
                excluded_letters: String::new(),
                remaining_letters: join_letters(remaining),
            },
            GuessOutcome::Scored {
                word,
                score,
                outcome,
                remaining,
                ..
            } => WordGuessResponse {
                word: word.clone(),
                is_correct: *outcome == GameOutcome::Won,
                game_over: outcome.is_terminal(),
                valid_guess: true,
                correct_positions: score.pattern(),
                included_letters: join_letters(&score.included),
                excluded_letters: join_letters(&score.excluded),
                remaining_letters: join_letters(remaining),
            },
        }
    }
}

/// One player's progress through a single day's puzzle.
#[derive(Debug, Clone)]
pub struct GameSession {
    secret_word: String, // Hidden from clients
    guess_count: u32,
    outcome: GameOutcome,
    used_letters: BTreeSet<char>,
    remaining_letters: BTreeSet<char>,
    created_on: NaiveDate,
}

impl GameSession {
    pub fn new(secret_word: &str, created_on: NaiveDate) -> Self {
        Self {
            secret_word: normalize_guess(secret_word),
            guess_count: 0,
            outcome: GameOutcome::InProgress,
            used_letters: BTreeSet::new(),
            remaining_letters: alphabet(),
            created_on,
        }
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn guess_count(&self) -> u32 {
        self.guess_count
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn used_letters(&self) -> &BTreeSet<char> {
        &self.used_letters
    }

    pub fn remaining_letters(&self) -> &BTreeSet<char> {
        &self.remaining_letters
    }

    pub fn created_on(&self) -> NaiveDate {
        self.created_on
    }

    /// A session drawn for an earlier day must not keep being played.
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.created_on != today
    }

    /// Reply for a guess that arrives after the session has finished.
    pub fn terminal_echo(&self, raw_guess: &str) -> GuessOutcome {
        let (included, excluded): (BTreeSet<char>, BTreeSet<char>) = self
            .used_letters
            .iter()
            .partition(|ch| self.secret_word.contains(**ch));

        GuessOutcome::GameOver {
            word: normalize_guess(raw_guess),
            won: self.outcome == GameOutcome::Won,
            letters: LetterSnapshot {
                included,
                excluded,
                remaining: self.remaining_letters.clone(),
            },
        }
    }

    /// Apply one guess whose dictionary status has already been looked up.
    pub fn submit_guess(&mut self, raw_guess: &str, is_valid_word: bool) -> GuessOutcome {
        if self.is_terminal() {
            return self.terminal_echo(raw_guess);
        }

        let word = normalize_guess(raw_guess);
        if !is_valid_word || !is_well_formed_guess(&word) {
            return GuessOutcome::InvalidWord {
                word,
                remaining: self.remaining_letters.clone(),
            };
        }

        self.guess_count += 1;
        let score = ScoringEngine::score(&self.secret_word, &word);

        // Win is checked before the guess limit so a correct final guess wins.
        if word == self.secret_word {
            self.outcome = GameOutcome::Won;
        } else if self.guess_count >= MAX_GUESSES {
            self.outcome = GameOutcome::Lost;
        }

        for ch in word.chars() {
            self.used_letters.insert(ch);
            self.remaining_letters.remove(&ch);
        }

        GuessOutcome::Scored {
            word,
            score,
            outcome: self.outcome,
            guess_count: self.guess_count,
            just_finished: self.is_terminal(),
            remaining: self.remaining_letters.clone(),
        }
    }
}
