//! Save index manifest.
//!
//! The store cannot list its keys, so the set of saves is tracked in a
//! manifest kept under [`SaveIndex::KEY`]:
//!
//! ```text
//! guild-manager-save-index  →  {"version":1,"entries":[{"id":..,"title":..,"timestamp":..}, ...]}
//! guild-manager-game-<id>   →  save payload (see codec)
//! ```
//!
//! Entries are kept in insertion order; ordering for display is computed on
//! read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PersistenceError, Result};
use crate::repository::KeyValueStore;

/// Index entry describing one stored save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Durable list of every save blob currently stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveIndex {
    version: u32,
    entries: Vec<SaveMetadata>,
}

impl SaveIndex {
    /// Store key holding the manifest.
    pub const KEY: &'static str = "guild-manager-save-index";
    pub const VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            entries: Vec::new(),
        }
    }

    /// Reads the manifest; a missing manifest is an empty index.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let Some(text) = store.load(Self::KEY).await? else {
            return Ok(Self::new());
        };
        let index: Self = serde_json::from_str(&text)?;
        if index.version > Self::VERSION {
            return Err(PersistenceError::Serialization(format!(
                "unsupported save index version {}",
                index.version
            )));
        }
        Ok(index)
    }

    pub async fn persist(&self, store: &dyn KeyValueStore) -> Result<()> {
        let text = serde_json::to_string(self)?;
        store.save(Self::KEY, &text).await?;
        tracing::debug!("Rewrote save index ({} entries)", self.entries.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn push(&mut self, entry: SaveMetadata) {
        self.entries.push(entry);
    }

    /// Removes the entry for `id`, if present.
    pub fn remove(&mut self, id: &str) -> Option<SaveMetadata> {
        let position = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(position))
    }

    /// Drops the oldest entries until at most `limit` remain and returns them,
    /// oldest first. Entries with equal timestamps go in insertion order.
    pub fn evict_over(&mut self, limit: usize) -> Vec<SaveMetadata> {
        let mut evicted = Vec::new();
        while self.entries.len() > limit {
            let oldest = self
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(position, entry)| (entry.timestamp, *position))
                .map(|(position, _)| position);
            match oldest {
                Some(position) => evicted.push(self.entries.remove(position)),
                None => break,
            }
        }
        evicted
    }

    /// Entries ordered newest first. Among equal timestamps the later insert
    /// comes first.
    pub fn newest_first(&self) -> Vec<SaveMetadata> {
        let mut entries: Vec<_> = self.entries.iter().rev().cloned().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }
}

impl Default for SaveIndex {
    fn default() -> Self {
        Self::new()
    }
}
