//! Game server entry point.
//!
//! Loads the static game data, opens file-backed character storage and runs
//! the character runtime until Ctrl-C. Client transport is out of scope here;
//! published events are logged as JSON so the process can be observed.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use mmo_runtime::{
    CharacterRepository, Event, FileCharacterStore, GameData, InventoryRepository, Runtime,
    RuntimeConfig, Topic,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_GAME_DATA: &str = "data/game.ron";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = RuntimeConfig::from_env();
    let _guard = setup_logging(&config.data_dir)?;

    let data_path = std::env::var("MMO_GAME_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_GAME_DATA));
    let data = GameData::load(&data_path)
        .with_context(|| format!("loading game data from {}", data_path.display()))?;
    tracing::info!(
        path = %data_path.display(),
        items = data.items.len(),
        npcs = data.npcs.len(),
        "game data loaded"
    );

    let store = Arc::new(
        FileCharacterStore::new(&config.data_dir)
            .context("opening character storage")?,
    );
    let runtime = Runtime::builder()
        .config(config)
        .game_data(&data)
        .repositories(
            Arc::clone(&store) as Arc<dyn CharacterRepository>,
            store as Arc<dyn InventoryRepository>,
        )
        .build()
        .await?;

    let loggers: Vec<JoinHandle<()>> = [Topic::Character, Topic::Combat, Topic::World]
        .into_iter()
        .map(|topic| tokio::spawn(log_events(topic, runtime.subscribe(topic))))
        .collect();

    tracing::info!("server running, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    runtime.shutdown().await?;
    for logger in loggers {
        logger.abort();
    }
    Ok(())
}

async fn log_events(topic: Topic, mut events: broadcast::Receiver<Event>) {
    loop {
        match events.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => tracing::debug!(target: "mmo_server::events", ?topic, %json),
                Err(error) => tracing::warn!(?topic, %error, "event not serializable"),
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(?topic, skipped, "event logger lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Logs to stderr and to a daily file under `{data_dir}/logs`.
fn setup_logging(data_dir: &std::path::Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "server.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!("Log directory: {}", log_dir.display());
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_game_data_is_valid() {
        let data = GameData::from_ron_str(include_str!("../data/game.ron")).unwrap();
        assert!(!data.items.is_empty());
        assert_eq!(data.spawns.len(), 4);
        assert_eq!(data.classes.len(), 6);
    }
}
