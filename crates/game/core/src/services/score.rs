use crate::config::GameConfig;
use crate::error::{CoreError, Result};
use crate::state::GameState;

/// Score and level progression.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreService;

impl ScoreService {
    /// Points actually awarded for `base` raw points.
    ///
    /// # Formula
    ///
    /// ```text
    /// awarded = round(base * config.score_multiplier * difficulty.score_multiplier)
    /// ```
    pub fn points_for(&self, base: i64, config: &GameConfig) -> Result<i64> {
        if base < 0 {
            return Err(CoreError::NegativeAmount { amount: base });
        }
        let scaled =
            base as f64 * config.score_multiplier * config.difficulty.score_multiplier();
        Ok(scaled.round() as i64)
    }

    /// Level reached at `score`, capped at `config.max_level`.
    pub fn level_for_score(&self, score: i64, config: &GameConfig) -> u32 {
        let earned = 1 + score.max(0) / GameConfig::POINTS_PER_LEVEL;
        u32::try_from(earned)
            .unwrap_or(u32::MAX)
            .min(config.max_level.max(1))
    }

    /// Awards `base` points and advances the level accordingly. Levels never go
    /// down through scoring.
    pub fn award(&self, state: GameState, base: i64, config: &GameConfig) -> Result<GameState> {
        let score = state.score.saturating_add(self.points_for(base, config)?);
        let level = self.level_for_score(score, config).max(state.level);
        Ok(state.with_score(score).with_level(level))
    }
}
