use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use game_core::{WordValidator, is_well_formed_guess, normalize_guess};
use game_types::{TodaysWord, ValidateWordRequest, ValidateWordResponse};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("word oracle unavailable: {0}")]
    WordOracleUnavailable(String),
    #[error("word oracle sent an invalid response: {0}")]
    InvalidResponse(String),
}

/// Source of the daily secret word and judge of dictionary words.
#[async_trait]
pub trait WordOracle: Send + Sync {
    async fn todays_word(&self, today: NaiveDate) -> Result<String, OracleError>;

    async fn validate_word(&self, word: &str) -> Result<bool, OracleError>;
}

/// Oracle backed by a dictionary held in this process.
pub struct LocalWordOracle {
    validator: WordValidator,
}

impl LocalWordOracle {
    pub fn new(validator: WordValidator) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl WordOracle for LocalWordOracle {
    async fn todays_word(&self, today: NaiveDate) -> Result<String, OracleError> {
        self.validator
            .word_for_day(today)
            .map_err(|e| OracleError::WordOracleUnavailable(e.to_string()))
    }

    async fn validate_word(&self, word: &str) -> Result<bool, OracleError> {
        if self.validator.is_empty() {
            return Err(OracleError::WordOracleUnavailable(
                "No words available".to_string(),
            ));
        }
        Ok(self.validator.is_valid_word(word))
    }
}

/// Oracle that calls a remote word service over HTTP.
pub struct HttpWordOracle {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWordOracle {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::WordOracleUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, OracleError> {
        let response = request
            .send()
            .await
            .map_err(|e| OracleError::WordOracleUnavailable(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| OracleError::WordOracleUnavailable(e.to_string()))
    }
}

#[async_trait]
impl WordOracle for HttpWordOracle {
    async fn todays_word(&self, today: NaiveDate) -> Result<String, OracleError> {
        let date = today.format("%Y-%m-%d").to_string();
        let request = self
            .client
            .get(format!("{}/word", self.base_url))
            .query(&[("date", date.as_str())]);

        let body: TodaysWord = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;

        let word = normalize_guess(&body.word);
        if !is_well_formed_guess(&word) {
            return Err(OracleError::InvalidResponse(format!(
                "'{}' is not a five-letter word",
                body.word
            )));
        }

        tracing::debug!("Word service returned secret word {} for {}", word, date);
        Ok(word)
    }

    async fn validate_word(&self, word: &str) -> Result<bool, OracleError> {
        let request = self
            .client
            .post(format!("{}/validate", self.base_url))
            .json(&ValidateWordRequest {
                word: word.to_string(),
            });

        let body: ValidateWordResponse = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;

        Ok(body.is_valid)
    }
}
