//! Runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::persistence::GameStateManagerOptions;

/// Configuration for wiring a state manager, its store and the autosave worker.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    pub manager: GameStateManagerOptions,
    /// Directory for the file store; `None` means the platform default.
    pub save_data_dir: Option<PathBuf>,
    pub autosave_interval: Duration,
}

impl RuntimeConfig {
    pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(60);

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SAVE_COMPRESSION` - Store saves gzip-compressed (default: false)
    /// - `SAVE_MAX_SAVES` - Retention limit for saves (default: 10)
    /// - `SAVE_DATA_DIR` - Directory for save files (default: platform-specific)
    /// - `AUTOSAVE_INTERVAL_SECS` - Seconds between autosave ticks (default: 60)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = env::var("SAVE_COMPRESSION") {
            config.manager.enable_compression = parse_flag(&value);
        }

        if let Some(max_saves) = read_env::<usize>("SAVE_MAX_SAVES") {
            config.manager.max_saves = max_saves.max(1);
        }

        config.save_data_dir = env::var("SAVE_DATA_DIR").ok().map(PathBuf::from);

        if let Some(secs) = read_env::<u64>("AUTOSAVE_INTERVAL_SECS") {
            config.autosave_interval = Duration::from_secs(secs.max(1));
        }

        config
    }

    /// Save directory, falling back to the platform data directory.
    ///
    /// - Linux: `~/.local/share/guild-manager/saves`
    /// - macOS: `~/Library/Application Support/guild-manager/saves`
    /// - Windows: `%APPDATA%\guild-manager\data\saves`
    /// - Fallback: `./save_data/saves`
    pub fn save_dir(&self) -> PathBuf {
        self.save_data_dir.clone().unwrap_or_else(default_save_dir)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            manager: GameStateManagerOptions::default(),
            save_data_dir: None,
            autosave_interval: Self::DEFAULT_AUTOSAVE_INTERVAL,
        }
    }
}

/// Platform-specific default directory for save files.
pub fn default_save_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "guild-manager")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join("saves")
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// An empty value counts as set.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "1" | "true" | "yes" | "on"
    )
}
