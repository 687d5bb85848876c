//! Session lifecycle state machine.
//!
//! ```text
//!   Initialized ──start──▶ Running ◀──resume── Paused
//!                            │  └────pause────▶  │
//!                            └──end──▶ GameOver ◀┘
//! ```
//!
//! Illegal transitions report `false` instead of raising, so UI layers can poll
//! legality directly. `GameOver` is terminal.

use std::sync::atomic::{AtomicU8, Ordering};

/// Phase of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum GameFlowState {
    Initialized = 0,
    Running = 1,
    Paused = 2,
    GameOver = 3,
}

impl GameFlowState {
    const fn from_repr(raw: u8) -> Self {
        match raw {
            0 => GameFlowState::Initialized,
            1 => GameFlowState::Running,
            2 => GameFlowState::Paused,
            _ => GameFlowState::GameOver,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, GameFlowState::GameOver)
    }
}

/// Thread-safe session phase tracker.
///
/// The phase lives in a single atomic and every transition is a
/// compare-and-set, so when several callers race the same transition exactly
/// one of them observes `true`.
#[derive(Debug)]
pub struct GameStateMachine {
    phase: AtomicU8,
}

impl GameStateMachine {
    pub const fn new() -> Self {
        Self {
            phase: AtomicU8::new(GameFlowState::Initialized as u8),
        }
    }

    pub fn state(&self) -> GameFlowState {
        GameFlowState::from_repr(self.phase.load(Ordering::Acquire))
    }

    /// `Initialized` → `Running`.
    pub fn start(&self) -> bool {
        self.transition(&[GameFlowState::Initialized], GameFlowState::Running)
    }

    /// `Running` → `Paused`.
    pub fn pause(&self) -> bool {
        self.transition(&[GameFlowState::Running], GameFlowState::Paused)
    }

    /// `Paused` → `Running`.
    pub fn resume(&self) -> bool {
        self.transition(&[GameFlowState::Paused], GameFlowState::Running)
    }

    /// `Running` or `Paused` → `GameOver`.
    pub fn end(&self) -> bool {
        self.transition(
            &[GameFlowState::Running, GameFlowState::Paused],
            GameFlowState::GameOver,
        )
    }

    fn transition(&self, allowed_from: &[GameFlowState], to: GameFlowState) -> bool {
        let mut observed = self.phase.load(Ordering::Acquire);
        loop {
            if !allowed_from.contains(&GameFlowState::from_repr(observed)) {
                return false;
            }
            match self.phase.compare_exchange(
                observed,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                // Lost the race; re-check legality against the winner's phase.
                Err(actual) => observed = actual,
            }
        }
    }
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
