use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Reply to `GetStats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameStatistics {
    pub players: u32,
    pub winners: u32,
    pub average_guesses: f64,
}

/// The single persisted daily statistics record.
///
/// `day` is an ISO `YYYY-MM-DD` date string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub day: String,
    pub players_today: u32,
    pub winners_today: u32,
    pub total_guesses_by_winners: u32,
}
