use serde::{Deserialize, Serialize};

/// Tuning for a [`GameStateManager`](super::GameStateManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateManagerOptions {
    /// Store payloads as `gz:` + base64(gzip(json)) instead of plain JSON.
    pub enable_compression: bool,
    /// Retention limit; the oldest saves are evicted beyond it. Values below
    /// 1 are treated as 1.
    pub max_saves: usize,
}

impl GameStateManagerOptions {
    pub const DEFAULT_MAX_SAVES: usize = 10;

    pub const fn new() -> Self {
        Self {
            enable_compression: false,
            max_saves: Self::DEFAULT_MAX_SAVES,
        }
    }

    pub fn with_compression(mut self, enable_compression: bool) -> Self {
        self.enable_compression = enable_compression;
        self
    }

    pub fn with_max_saves(mut self, max_saves: usize) -> Self {
        self.max_saves = max_saves;
        self
    }

    /// Retention limit actually enforced.
    pub fn effective_max_saves(&self) -> usize {
        self.max_saves.max(1)
    }
}

impl Default for GameStateManagerOptions {
    fn default() -> Self {
        Self::new()
    }
}
