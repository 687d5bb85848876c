//! Stateless gameplay calculators.
//!
//! Each service takes a snapshot by value and returns the successor snapshot;
//! none of them hold state or perform I/O.
mod combat;
mod inventory;
mod score;

pub use combat::CombatService;
pub use inventory::InventoryService;
pub use score::ScoreService;
