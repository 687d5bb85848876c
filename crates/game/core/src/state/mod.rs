//! Session snapshot representation.
//!
//! A [`GameState`] is an immutable value: every gameplay change produces a new
//! instance through the `with_*` builders, and holders swap the whole value
//! rather than editing it in place.
mod snapshot;

pub use snapshot::{GameState, ItemId, Position};

use crate::config::GameConfig;

/// A [`GameState`] paired with the [`GameConfig`] it was played under.
///
/// This is the unit that gets persisted: its serialized form is
/// `{ "state": ..., "config": ... }`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub state: GameState,
    pub config: GameConfig,
}

impl Snapshot {
    pub fn new(state: GameState, config: GameConfig) -> Self {
        Self { state, config }
    }

    pub fn into_parts(self) -> (GameState, GameConfig) {
        (self.state, self.config)
    }
}
