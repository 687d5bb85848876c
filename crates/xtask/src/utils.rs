//! Utility functions for xtask commands

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use guild_runtime::{FileStore, GameStateManager, RuntimeConfig};

/// Build a single-threaded runtime for one command.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

/// Open a state manager over the file store in `dir`.
pub async fn open_manager(dir: &Path) -> Result<GameStateManager> {
    if !dir.exists() {
        anyhow::bail!(
            "Save directory does not exist: {}\n\
             No saves found. Run the game first or pass --data-dir.",
            dir.display()
        );
    }

    tracing::debug!("Opening save directory {}", dir.display());
    let store = FileStore::new(dir)
        .with_context(|| format!("Failed to open save directory: {}", dir.display()))?;
    let options = RuntimeConfig::from_env().manager;
    GameStateManager::open(Arc::new(store), options)
        .await
        .with_context(|| format!("Failed to read save index in {}", dir.display()))
}

/// Prompt user for confirmation
pub fn confirm() -> Result<bool> {
    print!("{} ", style("Proceed? [y/N]").yellow().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Format bytes into human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
