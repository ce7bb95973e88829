use game_types::LetterStatus;
use std::collections::{BTreeSet, HashMap};

/// Feedback for one guess against the secret word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessScore {
    pub letters: Vec<LetterStatus>,
    pub included: BTreeSet<char>,
    pub excluded: BTreeSet<char>,
}

impl GuessScore {
    /// Wire form of the per-position feedback, e.g. `"*?xx*"`.
    pub fn pattern(&self) -> String {
        self.letters.iter().map(|status| status.symbol()).collect()
    }

    pub fn is_all_exact(&self) -> bool {
        !self.letters.is_empty() && self.letters.iter().all(|s| *s == LetterStatus::Exact)
    }
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Score `guess` against `secret`.
    ///
    /// Both words must already be normalized to the same length; callers
    /// reject malformed guesses before scoring. Exact matches are claimed
    /// first so that a repeated guess letter is never credited more times
    /// than it occurs in the secret.
    pub fn score(secret: &str, guess: &str) -> GuessScore {
        let secret_chars: Vec<char> = secret.chars().collect();
        let guess_chars: Vec<char> = guess.chars().collect();

        // Count frequency of each letter in the secret for handling duplicates
        let mut remaining: HashMap<char, usize> = HashMap::new();
        for ch in &secret_chars {
            *remaining.entry(*ch).or_insert(0) += 1;
        }

        let mut letters = vec![LetterStatus::Absent; guess_chars.len()];
        let mut included = BTreeSet::new();
        let mut excluded = BTreeSet::new();

        // First pass: exact positions
        for (i, &ch) in guess_chars.iter().enumerate() {
            if secret_chars.get(i) == Some(&ch) {
                letters[i] = LetterStatus::Exact;
                included.insert(ch);
                if let Some(count) = remaining.get_mut(&ch) {
                    *count -= 1;
                }
            }
        }

        // Second pass: present elsewhere, or absent
        for (i, &ch) in guess_chars.iter().enumerate() {
            if letters[i] == LetterStatus::Exact {
                continue;
            }

            match remaining.get_mut(&ch) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    letters[i] = LetterStatus::Partial;
                    included.insert(ch);
                }
                _ => {
                    excluded.insert(ch);
                }
            }
        }

        // A letter credited anywhere in this guess is not reported as excluded,
        // even if a surplus copy of it was marked absent.
        excluded.retain(|ch| !included.contains(ch));

        GuessScore {
            letters,
            included,
            excluded,
        }
    }
}
