//! Store contract consumed by the persistence layer.

use async_trait::async_trait;

use super::Result;

/// Minimal asynchronous text store.
///
/// Implementations make no transactional promises and may be shared with
/// other writers, so callers must not assume exclusive access. Retries, if
/// any, belong inside the implementation.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Writes `text` under `key`, replacing any previous value.
    async fn save(&self, key: &str, text: &str) -> Result<()>;

    /// Reads the value under `key`; `Ok(None)` when absent.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;
}
