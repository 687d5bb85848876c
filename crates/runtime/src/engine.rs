//! Gameplay orchestrator.
//!
//! [`GameEngineCore`] applies gameplay actions to the session snapshot through
//! the stateless services in `guild-core` and announces each change on the
//! [`EventBus`]. It owns no persistence; hand [`GameEngineCore::snapshot`] to a
//! [`GameStateManager`](crate::GameStateManager) to save.

use std::sync::Arc;

use guild_core::{
    CombatService, CoreError, GameConfig, GameFlowState, GameState, GameStateMachine,
    InventoryService, ItemId, ScoreService, Snapshot,
};
use parking_lot::RwLock;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::events::{DomainEvent, EventBus, EventKind};

const EVENT_SOURCE: &str = "guild-manager.engine";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("game is not running (current state: {state})")]
    NotRunning { state: GameFlowState },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Session orchestrator wiring the gameplay services to the event bus.
pub struct GameEngineCore {
    bus: EventBus,
    machine: GameStateMachine,
    session: RwLock<Option<Arc<Snapshot>>>,
    score: ScoreService,
    combat: CombatService,
    inventory: InventoryService,
}

impl GameEngineCore {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            machine: GameStateMachine::new(),
            session: RwLock::new(None),
            score: ScoreService,
            combat: CombatService,
            inventory: InventoryService,
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn flow_state(&self) -> GameFlowState {
        self.machine.state()
    }

    pub fn state(&self) -> Option<GameState> {
        self.session.read().as_ref().map(|s| s.state.clone())
    }

    /// Current state/config pair, ready to hand to the state manager.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.session.read().as_deref().cloned()
    }

    /// Starts a fresh session under `config`. Returns `false` if the session
    /// was already started.
    pub async fn start_game(&self, config: GameConfig) -> bool {
        let state = GameState::new(format!("session-{}", Uuid::new_v4().simple()), config.initial_health);
        let session_id = state.id.clone();
        let difficulty = config.difficulty.to_string();
        {
            // Actions check the phase under this lock, so they never observe
            // `Running` without a session.
            let mut session = self.session.write();
            if !self.machine.start() {
                return false;
            }
            *session = Some(Arc::new(Snapshot::new(state, config)));
        }
        info!("Game started: session={}", session_id);

        self.publish(
            EventKind::GameStarted,
            json!({ "sessionId": session_id, "difficulty": difficulty }),
        )
        .await;
        true
    }

    pub fn pause(&self) -> bool {
        self.machine.pause()
    }

    pub fn resume(&self) -> bool {
        self.machine.resume()
    }

    /// Ends the session. Returns `false` if it was not running or paused.
    pub async fn end_game(&self) -> bool {
        self.finish("ended").await
    }

    pub async fn move_player(&self, dx: f64, dy: f64) -> Result<GameState> {
        let state = self.apply(|state, _| {
            let position = state.position.translated(dx, dy);
            Ok(state.with_position(position))
        })?;
        debug!("Player moved to ({}, {})", state.position.x, state.position.y);

        self.publish(
            EventKind::PlayerMoved,
            json!({ "x": state.position.x, "y": state.position.y }),
        )
        .await;
        Ok(state)
    }

    /// Applies a hit; reaching 0 health ends the game.
    pub async fn damage_player(&self, amount: i32) -> Result<GameState> {
        let mut previous = 0;
        let state = self.apply(|state, config| {
            previous = state.health;
            Ok(self.combat.apply_damage(state, amount, config)?)
        })?;

        self.publish(
            EventKind::PlayerDamaged,
            json!({ "amount": previous - state.health }),
        )
        .await;
        self.publish_health(previous, state.health).await;

        if self.combat.is_defeated(&state) {
            self.finish("defeated").await;
        }
        Ok(state)
    }

    pub async fn heal_player(&self, amount: i32) -> Result<GameState> {
        let mut previous = 0;
        let state = self.apply(|state, config| {
            previous = state.health;
            Ok(self.combat.heal(state, amount, config)?)
        })?;
        self.publish_health(previous, state.health).await;
        Ok(state)
    }

    pub async fn add_score(&self, points: i64) -> Result<GameState> {
        let mut previous = 0;
        let state = self.apply(|state, config| {
            previous = state.score;
            Ok(self.score.award(state, points, config)?)
        })?;

        self.publish(
            EventKind::ScoreChanged,
            json!({ "previous": previous, "current": state.score, "level": state.level }),
        )
        .await;
        Ok(state)
    }

    pub fn pick_up_item(&self, item: ItemId) -> Result<GameState> {
        self.apply(|state, _| Ok(self.inventory.add_item(state, item)?))
    }

    pub fn drop_item(&self, item: &ItemId) -> Result<GameState> {
        self.apply(|state, _| Ok(self.inventory.remove_item(state, item)?))
    }

    /// Runs `action` against the current snapshot under the session write
    /// lock and swaps in the result.
    fn apply<F>(&self, action: F) -> Result<GameState>
    where
        F: FnOnce(GameState, &GameConfig) -> Result<GameState>,
    {
        let mut session = self.session.write();
        let flow = self.machine.state();
        let Some(current) = session.as_ref().filter(|_| flow == GameFlowState::Running) else {
            return Err(EngineError::NotRunning { state: flow });
        };
        let config = current.config.clone();
        let next = action(current.state.clone(), &config)?;
        *session = Some(Arc::new(Snapshot::new(next.clone(), config)));
        Ok(next)
    }

    async fn finish(&self, reason: &str) -> bool {
        if !self.machine.end() {
            return false;
        }
        let score = self.state().map(|state| state.score).unwrap_or_default();
        info!("Game ended: reason={}, score={}", reason, score);

        self.publish(EventKind::GameEnded, json!({ "reason": reason, "score": score }))
            .await;
        true
    }

    async fn publish_health(&self, previous: i32, current: i32) {
        if previous != current {
            self.publish(
                EventKind::PlayerHealthChanged,
                json!({ "previous": previous, "current": current }),
            )
            .await;
        }
    }

    async fn publish(&self, kind: EventKind, data: serde_json::Value) {
        self.bus
            .publish(DomainEvent::new(kind, EVENT_SOURCE).with_data(data))
            .await;
    }
}
