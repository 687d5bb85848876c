//! Engine-agnostic game domain shared by the runtime and offline tools.
//!
//! `guild-core` defines the session snapshot ([`GameState`]), its pairing
//! configuration ([`GameConfig`]), the session lifecycle ([`GameStateMachine`])
//! and the stateless gameplay calculators in [`services`]. Nothing here owns
//! threads, timers, or storage; those concerns live in the runtime crate.
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod state;

pub use config::{Difficulty, GameConfig};
pub use error::CoreError;
pub use services::{CombatService, InventoryService, ScoreService};
pub use session::{GameFlowState, GameStateMachine};
pub use state::{GameState, ItemId, Position, Snapshot};
