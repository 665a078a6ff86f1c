use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::errors::{SessionStoreError, StoreResult};
use crate::id::SessionId;
use crate::store::{SessionData, SessionStore};

/// In-memory implementation of SessionStore
///
/// The lock only keeps individual reads and writes consistent. A request that
/// loads a session and later saves it does so in two separate operations, so
/// two concurrent requests for the same session race and the last save wins.
/// Data lives as long as the store and is lost when the process exits.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    /// Thread-safe storage of session data
    sessions: Arc<RwLock<HashMap<SessionId, SessionData>>>,
}

impl InMemorySessionStore {
    /// Create a new InMemorySessionStore
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn contains(&self, id: &SessionId) -> StoreResult<bool> {
        let sessions = self.sessions.read().map_err(|e| {
            SessionStoreError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(sessions.contains_key(id))
    }

    async fn get(&self, id: &SessionId) -> StoreResult<SessionData> {
        let sessions = self.sessions.read().map_err(|e| {
            SessionStoreError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;

        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| SessionStoreError::NotFound(id.to_string()))
    }

    async fn set(&self, id: &SessionId, data: SessionData) -> StoreResult<()> {
        let mut sessions = self.sessions.write().map_err(|e| {
            SessionStoreError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        sessions.insert(id.clone(), data);
        debug!(session_id = %id, total = sessions.len(), "Stored session data");
        Ok(())
    }

    async fn len(&self) -> StoreResult<usize> {
        let sessions = self.sessions.read().map_err(|e| {
            SessionStoreError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(pairs: &[(&str, serde_json::Value)]) -> SessionData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemorySessionStore::new();
        let id = SessionId::random();

        store.set(&id, data(&[("counter", json!(3))])).await.unwrap();

        assert!(store.contains(&id).await.unwrap());
        let retrieved = store.get(&id).await.unwrap();
        assert_eq!(retrieved.get("counter"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = InMemorySessionStore::new();
        let id = SessionId::random();

        assert!(!store.contains(&id).await.unwrap());
        let result = store.get(&id).await;
        assert!(matches!(result, Err(SessionStoreError::NotFound(missing)) if missing == id.to_string()));
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = InMemorySessionStore::new();
        let id = SessionId::random();

        store.set(&id, data(&[("a", json!(1))])).await.unwrap();
        store.set(&id, data(&[("b", json!("two"))])).await.unwrap();

        let retrieved = store.get(&id).await.unwrap();
        assert_eq!(retrieved, data(&[("b", json!("two"))]));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_entries_accumulate() {
        let store = InMemorySessionStore::new();
        assert!(store.is_empty().await.unwrap());

        for _ in 0..5 {
            store.set(&SessionId::random(), SessionData::new()).await.unwrap();
        }

        assert_eq!(store.len().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let store = InMemorySessionStore::new();
        let other = store.clone();
        let id = SessionId::random();

        store.set(&id, SessionData::new()).await.unwrap();

        assert!(other.contains(&id).await.unwrap());
    }
}
