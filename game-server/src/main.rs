use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use game_core::WordValidator;
use game_persistence::{
    JsonFileStatsStore, MemoryStatsStore, SeaOrmStatsStore, StatsStore,
    connection::connect_and_migrate,
};
use game_server::{
    config::{Config, StatsBackend},
    create_routes,
    game_manager::GameManager,
    shutdown_signal,
    stats::StatsAggregator,
    word_oracle::{HttpWordOracle, LocalWordOracle, WordOracle},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Wordle server...");

    let config = Config::from_env().context("Invalid configuration")?;

    let oracle: Arc<dyn WordOracle> = match &config.word_service_url {
        Some(url) => {
            info!("Using word service at {}", url);
            Arc::new(HttpWordOracle::new(url, config.oracle_timeout)?)
        }
        None => {
            info!("Loading words from {}", config.words_file.display());
            Arc::new(LocalWordOracle::new(WordValidator::from_file(
                &config.words_file,
            )?))
        }
    };

    let store: Arc<dyn StatsStore> = match config.stats_backend {
        StatsBackend::Sqlite => {
            let db = connect_and_migrate(&config.database_url)
                .await
                .context("Failed to connect to database and run migrations")?;
            Arc::new(SeaOrmStatsStore::new(db))
        }
        StatsBackend::Json => {
            info!("Keeping stats in {}", config.stats_file.display());
            Arc::new(JsonFileStatsStore::new(&config.stats_file))
        }
        StatsBackend::Memory => {
            info!("Keeping stats in memory only");
            Arc::new(MemoryStatsStore::new())
        }
    };

    let stats = Arc::new(StatsAggregator::new(store, config.stats_lock_timeout));
    let game_manager = Arc::new(GameManager::new(oracle, stats));

    let routes = create_routes(game_manager.clone());

    // Start cleanup task
    let cleanup_game_manager = game_manager.clone();
    let cleanup_interval = config.session_cleanup_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            cleanup_game_manager.cleanup_stale_sessions();
        }
    });

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown((config.host, config.port), shutdown_signal())
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
    Ok(())
}
