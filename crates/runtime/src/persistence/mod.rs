//! Save/load lifecycle for game snapshots.
//!
//! [`GameStateManager`] owns the current [`Snapshot`](guild_core::Snapshot),
//! encodes it into a self-describing text payload (see [`codec`]), stores it
//! through a [`KeyValueStore`](crate::repository::KeyValueStore), and keeps the
//! bounded save index that is the only authoritative list of saves.

pub mod codec;
mod error;
mod forwarder;
mod index;
mod listeners;
mod manager;
mod options;

pub use error::{PersistenceError, Result};
pub use index::{SaveIndex, SaveMetadata};
pub use listeners::ListenerId;
pub use manager::{GameStateManager, SAVE_ID_PREFIX};
pub use options::GameStateManagerOptions;
