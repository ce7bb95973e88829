use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Problems reported in-band to a client on the Play stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    InvalidGuessLength { word: String },
    MalformedMessage { reason: String },
    ServiceUnavailable { message: String },
}
