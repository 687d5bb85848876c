//! Delete a single save and its index entry

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use crate::{dirs, utils};

/// Delete a single save
#[derive(Parser, Debug)]
pub struct DeleteSave {
    /// Id of the save to delete
    #[arg(value_name = "ID")]
    id: String,

    /// Custom save directory (defaults to SAVE_DATA_DIR or the platform location)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,
}

impl DeleteSave {
    pub fn execute(self) -> Result<()> {
        let dir = dirs::save_dir(self.data_dir);

        println!("Deleting save {}", style(&self.id).cyan());
        if !self.yes && !utils::confirm()? {
            println!("{}", style("Cancelled").dim());
            return Ok(());
        }

        utils::runtime()?.block_on(async {
            let manager = utils::open_manager(&dir).await?;
            manager
                .delete_save(&self.id)
                .await
                .with_context(|| format!("Failed to delete save {}", self.id))
        })?;

        println!("{}", style("✓ Deleted").green().bold());
        Ok(())
    }
}
