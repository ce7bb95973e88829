use serde::Deserialize;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use warp::Filter;
use warp::http::StatusCode;

use crate::game_manager::GameManager;

pub mod config;
pub mod game_manager;
pub mod session_registry;
pub mod stats;
pub mod websocket;
pub mod word_oracle;
pub mod word_service;

#[derive(Debug, Deserialize)]
struct PlayQuery {
    session: Option<String>,
}

pub fn create_routes(
    game_manager: Arc<GameManager>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let game_manager_filter = warp::any().map(move || game_manager.clone());

    // Play stream, optionally resuming a keyed session
    let play = warp::path("play")
        .and(warp::path::end())
        .and(warp::ws())
        .and(warp::query::<PlayQuery>())
        .and(game_manager_filter.clone())
        .map(|ws: warp::ws::Ws, query: PlayQuery, game_mgr| {
            ws.on_upgrade(move |socket| {
                websocket::handle_connection(socket, query.session, game_mgr)
            })
        });

    let stats = warp::path("stats")
        .and(warp::path::end())
        .and(warp::get())
        .and(game_manager_filter)
        .and_then(handle_stats_request);

    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET"]);

    play.or(stats)
        .or(health)
        .with(cors)
        .with(warp::log("wordle_server"))
}

async fn handle_stats_request(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match game_manager.get_stats().await {
        Ok(stats) => Ok(warp::reply::with_status(
            warp::reply::json(&stats),
            StatusCode::OK,
        )),
        Err(err) => {
            error!("Failed to read stats: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "Statistics are temporarily unavailable"
                })),
                StatusCode::SERVICE_UNAVAILABLE,
            ))
        }
    }
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down gracefully..."),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully..."),
    }
}
