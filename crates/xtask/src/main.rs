//! Development tasks for the guild manager project
//!
//! This binary provides save-data utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{Clean, DeleteSave, ListSaves, ReadSave};

/// Development tasks for the guild manager project
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Save data tools for the guild manager", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List saves, most recent first
    ListSaves(ListSaves),

    /// Decode and inspect a save
    ReadSave(ReadSave),

    /// Delete a single save
    DeleteSave(DeleteSave),

    /// Delete all save data
    Clean(Clean),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for SAVE_DATA_DIR and other env vars)
    let _ = dotenvy::dotenv();

    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::ListSaves(cmd) => cmd.execute(),
        Command::ReadSave(cmd) => cmd.execute(),
        Command::DeleteSave(cmd) => cmd.execute(),
        Command::Clean(cmd) => cmd.execute(),
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
