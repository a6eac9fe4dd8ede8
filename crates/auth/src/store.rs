//! Durable token storage.
//!
//! The token store is the only mutable shared state in the SDK. It is written
//! by login/registration, by the refresh coordinator's success and failure
//! transitions, and by logout; every other component only reads it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::AuthError;
use crate::types::TokenPair;

/// Trait for token persistence.
///
/// Abstracts the durable key/value substrate so the rest of the SDK can be
/// tested against an in-memory implementation.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored token pair, if any.
    ///
    /// # Errors
    /// Returns an error if the substrate is unreadable, not if no tokens
    /// exist.
    async fn load(&self) -> Result<Option<TokenPair>, AuthError>;

    /// Persist a token pair, replacing any existing one.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn save(&self, tokens: &TokenPair) -> Result<(), AuthError>;

    /// Remove the stored token pair. Clearing an empty store is not an error.
    ///
    /// # Errors
    /// Returns an error if the deletion fails.
    async fn clear(&self) -> Result<(), AuthError>;
}

/// Token store backed by a JSON file on disk.
///
/// Survives process restarts, which is all the durability the SDK needs.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store persisting to the given path.
    ///
    /// The file is created on the first `save`; parent directories must
    /// already exist.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, AuthError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Store(format!("failed to read token file: {err}"))),
        };

        let tokens: TokenPair = serde_json::from_str(&contents)
            .map_err(|err| AuthError::Store(format!("corrupt token file: {err}")))?;

        Ok(Some(tokens))
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), AuthError> {
        let contents = serde_json::to_string_pretty(tokens)
            .map_err(|err| AuthError::Store(format!("failed to encode tokens: {err}")))?;

        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|err| AuthError::Store(format!("failed to write token file: {err}")))?;

        debug!(path = %self.path.display(), "tokens persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "tokens cleared");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Store(format!("failed to delete token file: {err}"))),
        }
    }
}

/// In-memory token store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a token pair.
    #[must_use]
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self { tokens: RwLock::new(Some(tokens)) }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, AuthError> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), AuthError> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pair() -> TokenPair {
        TokenPair::new("a.b.c".to_string(), Some("d.e.f".to_string()))
    }

    #[tokio::test]
    async fn file_store_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("tokens.json"));

        assert!(store.load().await.expect("load").is_none());

        store.save(&sample_pair()).await.expect("save");
        let loaded = store.load().await.expect("load");
        assert_eq!(loaded, Some(sample_pair()));
    }

    #[tokio::test]
    async fn file_store_overwrites_on_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("tokens.json"));

        store.save(&sample_pair()).await.expect("save");

        let rotated = TokenPair::new("x.y.z".to_string(), Some("d.e.f".to_string()));
        store.save(&rotated).await.expect("save");

        assert_eq!(store.load().await.expect("load"), Some(rotated));
    }

    #[tokio::test]
    async fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("tokens.json"));

        store.clear().await.expect("clear empty");

        store.save(&sample_pair()).await.expect("save");
        store.clear().await.expect("clear");
        store.clear().await.expect("clear again");

        assert!(store.load().await.expect("load").is_none());
    }

    #[tokio::test]
    async fn file_store_reports_corrupt_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tokens.json");
        tokio::fs::write(&path, "not json").await.expect("write");

        let store = FileTokenStore::new(&path);
        let result = store.load().await;
        assert!(matches!(result, Err(AuthError::Store(_))));
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().await.expect("load").is_none());

        store.save(&sample_pair()).await.expect("save");
        assert_eq!(store.load().await.expect("load"), Some(sample_pair()));

        store.clear().await.expect("clear");
        assert!(store.load().await.expect("load").is_none());
    }
}
