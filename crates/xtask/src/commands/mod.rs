//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod clean;
mod delete_save;
mod list_saves;
mod read_save;

pub use clean::Clean;
pub use delete_save::DeleteSave;
pub use list_saves::ListSaves;
pub use read_save::ReadSave;
