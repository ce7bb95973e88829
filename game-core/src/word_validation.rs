use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use game_types::WORD_LENGTH;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::path::Path;

/// Dictionary of playable words and the source of each day's secret word.
#[derive(Debug, Clone)]
pub struct WordValidator {
    valid_words: BTreeSet<String>,
}

impl WordValidator {
    /// Build a validator from a word list.
    ///
    /// Accepts either a JSON array of strings or one word per line, where
    /// blank lines and `#` comments are skipped. Only five-letter alphabetic
    /// words are kept.
    pub fn new(word_list: &str) -> Self {
        let raw_words: Vec<String> = if word_list.trim_start().starts_with('[') {
            match serde_json::from_str(word_list) {
                Ok(words) => words,
                Err(e) => {
                    tracing::warn!("Failed to parse JSON word list: {}", e);
                    Vec::new()
                }
            }
        } else {
            word_list
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string)
                .collect()
        };

        let valid_words = raw_words
            .into_iter()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| {
                word.chars().count() == WORD_LENGTH && word.chars().all(|c| c.is_ascii_alphabetic())
            })
            .collect();

        Self { valid_words }
    }

    /// Load a word list file, failing if it cannot be read or holds no
    /// playable words.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {}", path.display()))?;

        let validator = Self::new(&contents);
        if validator.is_empty() {
            return Err(anyhow!("No playable words found in {}", path.display()));
        }

        tracing::info!(
            "Loaded {} words from {}",
            validator.word_count(),
            path.display()
        );
        Ok(validator)
    }

    /// Small fixed dictionary for tests and local development.
    pub fn new_with_test_words() -> Self {
        Self::new(
            "about\nallot\napple\nbeach\nchair\ncrane\neerie\nhello\nhouse\nlolly\n\
             pious\nplane\nslate\nspeed\nstone\ntests\nvalid\nwater\nworld",
        )
    }

    /// Check if a word is valid for the game
    pub fn is_valid_word(&self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        self.valid_words.contains(&word)
    }

    pub fn word_count(&self) -> usize {
        self.valid_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valid_words.is_empty()
    }

    /// The secret word for `date`.
    ///
    /// Picked by hashing the ISO date, so every caller and every restart
    /// agrees on the word for a given day.
    pub fn word_for_day(&self, date: NaiveDate) -> Result<String> {
        if self.valid_words.is_empty() {
            return Err(anyhow!("No words available"));
        }

        let digest = Sha256::digest(date.format("%Y-%m-%d").to_string().as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        let index = (u64::from_be_bytes(prefix) % self.valid_words.len() as u64) as usize;

        self.valid_words
            .iter()
            .nth(index)
            .cloned()
            .ok_or_else(|| anyhow!("Word index {} out of range", index))
    }
}
