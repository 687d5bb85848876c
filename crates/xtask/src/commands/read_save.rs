//! Read and inspect a save
//!
//! Decodes a save payload (plain or `gz:` compressed) and displays its contents.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use guild_core::Snapshot;
use std::path::PathBuf;

use crate::{dirs, utils};

/// Decode and inspect a save
#[derive(Parser)]
pub struct ReadSave {
    /// Id of the save to read (see `list-saves`)
    #[arg(value_name = "ID")]
    id: String,

    /// Custom save directory (defaults to SAVE_DATA_DIR or the platform location)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Summary view (progress, health, inventory, config)
    Summary,
    /// Full JSON output
    Json,
}

impl ReadSave {
    pub fn execute(self) -> Result<()> {
        let dir = dirs::save_dir(self.data_dir);

        let snapshot = utils::runtime()?.block_on(async {
            let manager = utils::open_manager(&dir).await?;
            manager
                .load_game(&self.id)
                .await
                .with_context(|| format!("Failed to load save {}", self.id))
        })?;

        println!("{} {}", style("Save:").bold().cyan(), self.id);
        println!();

        match self.format {
            OutputFormat::Summary => print_summary(&snapshot),
            OutputFormat::Json => print_json(&snapshot)?,
        }

        Ok(())
    }
}

fn print_summary(snapshot: &Snapshot) {
    let Snapshot { state, config } = snapshot;

    println!("{}", style("=== Session ===").bold().green());
    println!("  Id: {}", state.id);
    println!("  Snapshot Time: {}", state.timestamp);
    println!("  Level: {} / {}", state.level, config.max_level);
    println!("  Score: {}", state.score);
    println!("  Health: {} / {}", state.health, config.initial_health);
    println!("  Position: ({:.2}, {:.2})", state.position.x, state.position.y);
    println!();

    println!("{}", style("=== Inventory ===").bold().yellow());
    if state.inventory.is_empty() {
        println!("  {}", style("(empty)").dim());
    }
    for (slot, item) in state.inventory.iter().enumerate() {
        println!("  [{}] {}", slot, item);
    }
    println!();

    println!("{}", style("=== Config ===").bold().magenta());
    println!("  Difficulty: {}", config.difficulty);
    println!("  Score Multiplier: {}", config.score_multiplier);
    println!("  Auto Save: {}", config.auto_save);
}

fn print_json(snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize save to JSON")?;
    println!("{}", json);
    Ok(())
}
