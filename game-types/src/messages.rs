use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameError, WordGuessResponse};

/// Frames the server writes on the Play stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    GuessResponse(WordGuessResponse),
    Error { error: GameError },
}

impl ServerMessage {
    pub fn error(error: GameError) -> Self {
        ServerMessage::Error { error }
    }
}
