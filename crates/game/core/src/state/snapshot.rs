use std::fmt;

use chrono::{DateTime, Utc};

/// Identifier of an inventory item.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Continuous world position of the player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by the given offset.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Point-in-time snapshot of a game session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub id: String,
    pub level: u32,
    pub score: i64,
    pub health: i32,
    /// Item ids in pickup order.
    pub inventory: Vec<ItemId>,
    pub position: Position,
    /// When this snapshot was produced.
    pub timestamp: DateTime<Utc>,
}

impl GameState {
    /// Creates the opening snapshot of a session: level 1, no score, empty
    /// inventory, standing at the origin with `initial_health`.
    pub fn new(id: impl Into<String>, initial_health: i32) -> Self {
        Self {
            id: id.into(),
            level: 1,
            score: 0,
            health: initial_health,
            inventory: Vec::new(),
            position: Position::ORIGIN,
            timestamp: Utc::now(),
        }
    }

    pub fn with_level(self, level: u32) -> Self {
        Self { level, ..self }.touched()
    }

    pub fn with_score(self, score: i64) -> Self {
        Self { score, ..self }.touched()
    }

    pub fn with_health(self, health: i32) -> Self {
        Self { health, ..self }.touched()
    }

    pub fn with_inventory(self, inventory: Vec<ItemId>) -> Self {
        Self { inventory, ..self }.touched()
    }

    pub fn with_position(self, position: Position) -> Self {
        Self { position, ..self }.touched()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    fn touched(self) -> Self {
        Self {
            timestamp: Utc::now(),
            ..self
        }
    }
}
