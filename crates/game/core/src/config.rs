/// Difficulty preset applied to damage and score calculations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Factor applied to incoming damage.
    pub const fn damage_multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    /// Factor applied to earned points, on top of [`GameConfig::score_multiplier`].
    pub const fn score_multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.5,
        }
    }
}

/// Session configuration, persisted 1:1 alongside a [`GameState`](crate::GameState).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GameConfig {
    /// Highest level a session can reach through scoring.
    pub max_level: u32,
    /// Health a fresh session starts with; also the healing cap.
    pub initial_health: i32,
    /// Global factor applied to earned points.
    pub score_multiplier: f64,
    /// Whether the session wants periodic autosaves.
    pub auto_save: bool,
    pub difficulty: Difficulty,
}

impl GameConfig {
    // ===== fixed rule constants =====
    pub const MAX_INVENTORY_SLOTS: usize = 20;
    pub const POINTS_PER_LEVEL: i64 = 1_000;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_LEVEL: u32 = 10;
    pub const DEFAULT_INITIAL_HEALTH: i32 = 100;
    pub const DEFAULT_SCORE_MULTIPLIER: f64 = 1.0;

    pub fn new() -> Self {
        Self {
            max_level: Self::DEFAULT_MAX_LEVEL,
            initial_health: Self::DEFAULT_INITIAL_HEALTH,
            score_multiplier: Self::DEFAULT_SCORE_MULTIPLIER,
            auto_save: false,
            difficulty: Difficulty::default(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
