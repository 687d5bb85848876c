//! Save directory resolution
//!
//! Follows the same rules as the runtime: `SAVE_DATA_DIR` when set, else the
//! platform data directory:
//! - macOS: `~/Library/Application Support/guild-manager/saves`
//! - Linux: `~/.local/share/guild-manager/saves` (or `$XDG_DATA_HOME/...`)
//! - Windows: `%APPDATA%\guild-manager\data\saves`
//! - Fallback: `./save_data/saves`

use std::path::PathBuf;

use guild_runtime::RuntimeConfig;

/// Resolve the save directory, preferring an explicit `--data-dir`.
pub fn save_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| RuntimeConfig::from_env().save_dir())
}
