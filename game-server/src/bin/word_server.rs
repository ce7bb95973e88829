use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use warp::Filter;

use game_core::WordValidator;
use game_server::{config::Config, shutdown_signal, word_service::word_service_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env().context("Invalid configuration")?;
    let validator = WordValidator::from_file(&config.words_file)?;

    let routes = word_service_routes(Arc::new(validator)).with(warp::log("word_service"));

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(
            (config.host, config.word_server_port),
            shutdown_signal(),
        )
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                config.host, config.word_server_port
            )
        })?;

    info!("Word service listening on {}", addr);
    server.await;
    info!("Word service stopped.");
    Ok(())
}
