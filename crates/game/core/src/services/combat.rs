use crate::config::GameConfig;
use crate::error::{CoreError, Result};
use crate::state::GameState;

/// Damage and healing rules for the player.
#[derive(Clone, Copy, Debug, Default)]
pub struct CombatService;

impl CombatService {
    /// Damage actually taken from a `raw` hit.
    ///
    /// # Formula
    ///
    /// ```text
    /// taken = ceil(raw * difficulty.damage_multiplier)
    /// ```
    ///
    /// A non-zero hit always deals at least 1 point.
    pub fn damage_taken(&self, raw: i32, config: &GameConfig) -> Result<i32> {
        if raw < 0 {
            return Err(CoreError::NegativeAmount {
                amount: i64::from(raw),
            });
        }
        if raw == 0 {
            return Ok(0);
        }
        let scaled = (f64::from(raw) * config.difficulty.damage_multiplier()).ceil() as i32;
        Ok(scaled.max(1))
    }

    /// Applies a hit; health bottoms out at 0.
    pub fn apply_damage(&self, state: GameState, raw: i32, config: &GameConfig) -> Result<GameState> {
        let taken = self.damage_taken(raw, config)?;
        let health = state.health.saturating_sub(taken).max(0);
        Ok(state.with_health(health))
    }

    /// Restores health up to `config.initial_health`.
    pub fn heal(&self, state: GameState, amount: i32, config: &GameConfig) -> Result<GameState> {
        if amount < 0 {
            return Err(CoreError::NegativeAmount {
                amount: i64::from(amount),
            });
        }
        let health = state
            .health
            .saturating_add(amount)
            .min(config.initial_health);
        Ok(state.with_health(health))
    }

    pub fn is_defeated(&self, state: &GameState) -> bool {
        !state.is_alive()
    }
}
