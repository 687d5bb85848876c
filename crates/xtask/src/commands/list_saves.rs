//! List saves recorded in the save index

use anyhow::Result;
use clap::Parser;
use console::style;
use guild_runtime::FileStore;
use std::path::PathBuf;

use crate::{dirs, utils};

/// List saves, most recent first
#[derive(Parser, Debug)]
pub struct ListSaves {
    /// Custom save directory (defaults to SAVE_DATA_DIR or the platform location)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl ListSaves {
    pub fn execute(self) -> Result<()> {
        let dir = dirs::save_dir(self.data_dir);

        let saves = utils::runtime()?.block_on(async {
            let manager = utils::open_manager(&dir).await?;
            anyhow::Ok(manager.save_list().await?)
        })?;

        println!("{} {}", style("Save Directory:").bold().cyan(), dir.display());
        println!();

        if saves.is_empty() {
            println!("{}", style("No saves found").dim());
            return Ok(());
        }

        println!(
            "{:<4} {:<26} {:<24} {:>10}  {}",
            style("#").bold(),
            style("Saved At").bold(),
            style("Title").bold(),
            style("Size").bold(),
            style("Id").bold()
        );
        let store = FileStore::new(&dir)?;
        for (n, save) in saves.iter().enumerate() {
            let size = store
                .key_path(&save.id)
                .ok()
                .and_then(|path| std::fs::metadata(path).ok())
                .map(|meta| utils::format_bytes(meta.len()))
                .unwrap_or_else(|| "missing".to_string());

            println!(
                "{:<4} {:<26} {:<24} {:>10}  {}",
                n + 1,
                save.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                save.title.as_deref().unwrap_or("(untitled)"),
                size,
                style(&save.id).dim()
            );
        }

        println!();
        println!("{} {}", style("Total:").bold(), saves.len());
        Ok(())
    }
}
