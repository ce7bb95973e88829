use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::game_manager::GameManager;

pub mod connection;
pub mod handlers;


pub use connection::{ConnectionId, PlayConnection};
use handlers::{MessageHandler, StreamControl};

/// Run one Play stream: read guesses in order, answer each, and stop once
/// the session is over or the word oracle fails.
pub async fn handle_connection(
    websocket: WebSocket,
    requested_session: Option<String>,
    game_manager: Arc<GameManager>,
) {
    let connection = PlayConnection::new(requested_session);
    info!(
        "New WebSocket connection: {} (session {})",
        connection.id, connection.session_key
    );

    let (mut ws_sender, mut ws_receiver) = websocket.split();
    let message_handler = MessageHandler::new(connection.clone(), game_manager);

    while let Some(result) = ws_receiver.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                warn!("WebSocket error for {}: {}", connection.id, e);
                break;
            }
        };

        if msg.is_close() {
            break;
        }

        // Only text frames carry guesses
        let Ok(text) = msg.to_str() else {
            continue;
        };

        let reply = message_handler.handle_text(text).await;
        let delivered = match serde_json::to_string(&reply.message) {
            Ok(json) => match ws_sender.send(Message::text(json)).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to send message to {}: {:?}", connection.id, e);
                    false
                }
            },
            Err(e) => {
                error!("Failed to serialize message: {:?}", e);
                false
            }
        };

        // A finished game is counted even when its reply was not delivered.
        match reply.control {
            StreamControl::Continue if delivered => {}
            StreamControl::Continue | StreamControl::Stop => break,
            StreamControl::Finish(outcome) => {
                message_handler.record_completion(&outcome).await;
                break;
            }
        }
    }

    if let Err(e) = ws_sender.close().await {
        warn!("Failed to close socket for {}: {:?}", connection.id, e);
    }

    info!("Connection {} disconnected", connection.id);
    message_handler.handle_disconnect();
}
