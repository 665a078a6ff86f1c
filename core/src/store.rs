use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StoreResult;
use crate::id::SessionId;

/// Data held for one session: string keys mapped to arbitrary JSON values
pub type SessionData = HashMap<String, Value>;

/// Trait defining the interface for session stores
///
/// Stores map a [`SessionId`] to the [`SessionData`] last saved under it.
/// Nothing is ever expired or evicted.
#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    /// Check whether data has been saved under the given ID
    async fn contains(&self, id: &SessionId) -> StoreResult<bool>;

    /// Get the data saved under the given ID
    ///
    /// Fails with `SessionStoreError::NotFound` if the ID is absent; callers
    /// are expected to check [`SessionStore::contains`] first.
    async fn get(&self, id: &SessionId) -> StoreResult<SessionData>;

    /// Save data under the given ID, replacing whatever was there
    async fn set(&self, id: &SessionId, data: SessionData) -> StoreResult<()>;

    /// Number of sessions held by the store
    async fn len(&self) -> StoreResult<usize>;

    async fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Type alias for Arc-wrapped SessionStore trait objects
pub type SessionStoreRef = Arc<dyn SessionStore>;
