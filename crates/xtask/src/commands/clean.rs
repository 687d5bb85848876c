//! Clean save data command
//!
//! Removes the whole save directory, index included.
//!
//! Safety: Always prompts for confirmation before deletion.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::{dirs, utils};

/// Delete all save data
#[derive(Parser, Debug)]
pub struct Clean {
    /// Custom save directory (defaults to SAVE_DATA_DIR or the platform location)
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Skip confirmation prompt (dangerous!)
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Clean {
    pub fn execute(self) -> Result<()> {
        let dir = dirs::save_dir(self.data_dir);

        if !dir.exists() {
            println!(
                "{}",
                style("Nothing to clean - save directory doesn't exist yet").dim()
            );
            return Ok(());
        }

        println!("{}", style("Clean Guild Manager Saves").yellow().bold());
        println!();
        println!("The following will be deleted:");
        println!("  {} {}", style("→").cyan(), style(dir.display()).bold());
        println!();

        if !self.yes && !utils::confirm()? {
            println!("{}", style("Cancelled").dim());
            return Ok(());
        }

        print!("Deleting save data... ");
        io::stdout().flush()?;
        std::fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to delete: {}", dir.display()))?;
        println!("{}", style("✓").green());

        Ok(())
    }
}
