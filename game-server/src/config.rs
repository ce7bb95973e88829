use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

/// Where the daily statistics record is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsBackend {
    Sqlite,
    Json,
    Memory,
}

impl FromStr for StatsBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StatsBackend::Sqlite),
            "json" => Ok(StatsBackend::Json),
            "memory" => Ok(StatsBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub word_server_port: u16,
    /// Remote word service; `None` means the dictionary is loaded in-process.
    pub word_service_url: Option<String>,
    pub words_file: PathBuf,
    pub stats_backend: StatsBackend,
    pub database_url: String,
    pub stats_file: PathBuf,
    pub stats_lock_timeout: Duration,
    pub oracle_timeout: Duration,
    pub session_cleanup_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            host: parse_var(&lookup, "HOST", "127.0.0.1")?,
            port: parse_var(&lookup, "PORT", "8080")?,
            word_server_port: parse_var(&lookup, "WORD_SERVER_PORT", "8081")?,
            word_service_url: lookup("WORD_SERVICE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            words_file: PathBuf::from(string("WORDS_FILE", "./data/wordle.json")),
            stats_backend: parse_var(&lookup, "STATS_BACKEND", "sqlite")?,
            database_url: string("DATABASE_URL", "sqlite://wordle.db?mode=rwc"),
            stats_file: PathBuf::from(string("STATS_FILE", "./data/user_stats.json")),
            stats_lock_timeout: Duration::from_millis(parse_var(
                &lookup,
                "STATS_LOCK_TIMEOUT_MS",
                "10000",
            )?),
            oracle_timeout: Duration::from_millis(parse_var(&lookup, "ORACLE_TIMEOUT_MS", "5000")?),
            session_cleanup_interval: Duration::from_secs(parse_var(
                &lookup,
                "SESSION_CLEANUP_SECONDS",
                "300",
            )?),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            word_server_port: 8081,
            word_service_url: None,
            words_file: PathBuf::from("./data/wordle.json"),
            stats_backend: StatsBackend::Sqlite,
            database_url: "sqlite://wordle.db?mode=rwc".to_string(),
            stats_file: PathBuf::from("./data/user_stats.json"),
            stats_lock_timeout: Duration::from_millis(10_000),
            oracle_timeout: Duration::from_millis(5_000),
            session_cleanup_interval: Duration::from_secs(300),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value,
    })
}
