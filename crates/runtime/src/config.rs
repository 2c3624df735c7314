//! Runtime configuration and its environment loader.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use mmo_core::{GameConfig, MapId, Position};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    /// Period of the per-character and per-pet tick.
    pub tick_interval: Duration,
    /// Period of the on-sight refresh task.
    pub visibility_interval: Duration,
    /// Chebyshev radius of the on-sight sets, also the attack and pick-up reach.
    pub visibility_radius: u32,
    pub event_buffer_size: usize,
    pub persistence_queue_size: usize,
    /// Save attempts before an entity is handed back to the dirty set.
    pub save_retries: u32,
    /// First retry delay; doubles on every attempt.
    pub save_backoff: Duration,
    /// Where new characters appear.
    pub spawn_position: Position,
    /// Root for file-backed storage and logs.
    pub data_dir: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            tick_interval: Duration::from_secs(1),
            visibility_interval: Duration::from_secs(1),
            visibility_radius: 50,
            event_buffer_size: 1_024,
            persistence_queue_size: 256,
            save_retries: 3,
            save_backoff: Duration::from_millis(100),
            spawn_position: Position::new(MapId(1), 0, 0),
            data_dir: default_data_dir(),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MMO_TICK_MS` - Character tick period in milliseconds (default: 1000)
    /// - `MMO_VISIBILITY_MS` - On-sight refresh period in milliseconds (default: 1000)
    /// - `MMO_VISIBILITY_RADIUS` - On-sight radius in tiles (default: 50)
    /// - `MMO_EVENT_BUFFER` - Event bus capacity per topic (default: 1024)
    /// - `MMO_PERSIST_QUEUE` - Write-behind queue capacity (default: 256)
    /// - `MMO_SAVE_RETRIES` - Save attempts before marking dirty (default: 3)
    /// - `MMO_SAVE_BACKOFF_MS` - First retry delay in milliseconds (default: 100)
    /// - `MMO_SAVE_INTERVAL` - Ticks between periodic saves (default: 60)
    /// - `MMO_DATA_DIR` - Storage and log directory (default: platform-specific)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("MMO_TICK_MS") {
            config.tick_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("MMO_VISIBILITY_MS") {
            config.visibility_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(radius) = read_env::<u32>("MMO_VISIBILITY_RADIUS") {
            config.visibility_radius = radius;
        }
        if let Some(capacity) = read_env::<usize>("MMO_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("MMO_PERSIST_QUEUE") {
            config.persistence_queue_size = capacity.max(1);
        }
        if let Some(retries) = read_env::<u32>("MMO_SAVE_RETRIES") {
            config.save_retries = retries.max(1);
        }
        if let Some(ms) = read_env::<u64>("MMO_SAVE_BACKOFF_MS") {
            config.save_backoff = Duration::from_millis(ms);
        }
        if let Some(interval) = read_env::<u64>("MMO_SAVE_INTERVAL") {
            config.game.save_interval = interval.max(1);
        }
        if let Ok(dir) = env::var("MMO_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        config
    }

    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "mmo-server")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
