use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::repository::{KeyValueStore, Result, StoreError};

/// File-based implementation of [`KeyValueStore`].
///
/// # File Format
///
/// Each key is stored as `{key}.sav` under the base directory, holding the
/// value text verbatim. Writes go to `{key}.sav.tmp` first and are renamed
/// into place, so readers never observe a half-written value.
///
/// Keys are restricted to `[A-Za-z0-9._-]` and may not start with a dot.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub const EXTENSION: &'static str = "sav";

    /// Create a store rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path backing a key.
    pub fn key_path(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(StoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.base_dir.join(format!("{key}.{}", Self::EXTENSION)))
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn save(&self, key: &str, text: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let temp_path = path.with_extension(format!("{}.tmp", Self::EXTENSION));

        fs::write(&temp_path, text).await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!("Saved {} ({} bytes) to {}", key, text.len(), path.display());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;

        match fs::read_to_string(&path).await {
            Ok(text) => {
                tracing::debug!("Loaded {} from {}", key, path.display());
                Ok(Some(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Deleted {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_round_trip_and_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();

        store.save("guild-manager-game-1", "first").await.unwrap();
        store.save("guild-manager-game-1", "second").await.unwrap();

        let loaded = store.load("guild-manager-game-1").await.unwrap();
        assert_eq!(loaded.as_deref(), Some("second"));
        assert!(temp_dir.path().join("guild-manager-game-1.sav").exists());
        assert!(!temp_dir.path().join("guild-manager-game-1.sav.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();

        assert_eq!(store.load("nope").await.unwrap(), None);
        store.delete("nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_unsafe_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();

        for key in ["", "../escape", ".hidden", "a/b", "with space"] {
            assert!(
                matches!(store.save(key, "x").await, Err(StoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_reopen_sees_existing_values() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileStore::new(temp_dir.path()).unwrap();
            store.save("index", "{}").await.unwrap();
        }

        let store = FileStore::new(temp_dir.path().join(".")).unwrap();
        assert_eq!(store.load("index").await.unwrap().as_deref(), Some("{}"));
    }
}
