use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::{SessionError, SessionResult};
use crate::id::SessionId;
use crate::store::{SessionData, SessionStoreRef};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Data was found in the store under the incoming identifier
    Loaded,
    /// No usable identifier came in; the session starts empty under a fresh one
    New,
    /// Data has been written back to the store
    Saved,
}

/// A visitor's session for the duration of one request
///
/// Built once per request with [`Session::load`] and written back exactly once
/// with [`Session::save`].
#[derive(Debug)]
pub struct Session {
    store: SessionStoreRef,
    id: SessionId,
    data: SessionData,
    state: SessionState,
}

impl Session {
    /// Resolve a session from an optional incoming identifier.
    ///
    /// An identifier that is missing, empty, or unknown to the store yields a
    /// new empty session with a freshly generated identifier.
    pub async fn load(store: SessionStoreRef, incoming: Option<&str>) -> SessionResult<Self> {
        if let Some(id) = incoming.and_then(SessionId::parse) {
            if store.contains(&id).await? {
                let data = store.get(&id).await?;
                debug!(session_id = %id, keys = data.len(), "Loaded existing session");
                return Ok(Self {
                    store,
                    id,
                    data,
                    state: SessionState::Loaded,
                });
            }
            debug!(session_id = %id, "Unknown session id, starting a new session");
        }

        let id = SessionId::random();
        debug!(session_id = %id, "Created new session");
        Ok(Self {
            store,
            id,
            data: SessionData::new(),
            state: SessionState::New,
        })
    }

    /// Write the current data to the store and return the identifier it was saved under
    pub async fn save(&mut self) -> SessionResult<SessionId> {
        if self.state == SessionState::Saved {
            return Err(SessionError::AlreadySaved(self.id.to_string()));
        }

        self.store.set(&self.id, self.data.clone()).await?;
        self.state = SessionState::Saved;
        debug!(session_id = %self.id, "Saved session");
        Ok(self.id.clone())
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True if the session was created during this request
    pub fn is_new(&self) -> bool {
        self.state == SessionState::New
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Get a value, falling back to `default` when the key is absent
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.data.get(key).cloned().unwrap_or(default)
    }

    /// Get a value, failing with `SessionError::MissingKey` when the key is absent
    pub fn try_get(&self, key: &str) -> SessionResult<&Value> {
        self.data
            .get(key)
            .ok_or_else(|| SessionError::MissingKey(key.to_string()))
    }

    /// Deserialize a value into `T`. Absent keys yield `Ok(None)`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> SessionResult<Option<T>> {
        match self.data.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Set a value, returning the previous one if there was any
    pub fn insert<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> SessionResult<Option<Value>> {
        let value = serde_json::to_value(value)?;
        Ok(self.data.insert(key.into(), value))
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionStore;
    use crate::store::SessionStore;
    use serde_json::json;
    use std::sync::Arc;

    fn new_store() -> (Arc<InMemorySessionStore>, SessionStoreRef) {
        let store = Arc::new(InMemorySessionStore::new());
        let store_ref: SessionStoreRef = store.clone();
        (store, store_ref)
    }

    #[tokio::test]
    async fn test_no_incoming_id_creates_new_session() {
        let (_, store) = new_store();

        let session = Session::load(store, None).await.unwrap();

        assert_eq!(session.state(), SessionState::New);
        assert!(session.is_new());
        assert!(session.data().is_empty());
        assert_eq!(session.id().as_str().len(), 32);
    }

    #[tokio::test]
    async fn test_unknown_id_behaves_like_no_id() {
        let (backing, store) = new_store();

        let session = Session::load(store, Some("not-a-known-session")).await.unwrap();

        assert_eq!(session.state(), SessionState::New);
        assert_ne!(session.id().as_str(), "not-a-known-session");
        assert!(session.data().is_empty());
        assert!(backing.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_id_behaves_like_no_id() {
        let (_, store) = new_store();

        let session = Session::load(store, Some("")).await.unwrap();

        assert_eq!(session.state(), SessionState::New);
        assert!(!session.id().as_str().is_empty());
    }

    #[tokio::test]
    async fn test_known_id_loads_saved_data() {
        let (_, store) = new_store();

        let mut first = Session::load(store.clone(), None).await.unwrap();
        first.insert("counter", 1).unwrap();
        first.insert("name", "visitor").unwrap();
        let id = first.save().await.unwrap();

        let second = Session::load(store, Some(id.as_str())).await.unwrap();
        assert_eq!(second.state(), SessionState::Loaded);
        assert_eq!(second.id(), &id);
        assert_eq!(second.data(), first.data());
    }

    #[tokio::test]
    async fn test_load_then_save_is_idempotent() {
        let (backing, store) = new_store();

        let mut first = Session::load(store.clone(), None).await.unwrap();
        first.insert("counter", 7).unwrap();
        let id = first.save().await.unwrap();
        let before = backing.get(&id).await.unwrap();

        let mut second = Session::load(store, Some(id.as_str())).await.unwrap();
        let reissued = second.save().await.unwrap();

        assert_eq!(reissued, id);
        assert_eq!(backing.get(&id).await.unwrap(), before);
        assert_eq!(backing.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_twice_fails() {
        let (_, store) = new_store();

        let mut session = Session::load(store, None).await.unwrap();
        session.save().await.unwrap();
        assert_eq!(session.state(), SessionState::Saved);

        let result = session.save().await;
        assert!(matches!(result, Err(SessionError::AlreadySaved(_))));
    }

    #[tokio::test]
    async fn test_strict_and_defaulting_accessors() {
        let (_, store) = new_store();
        let mut session = Session::load(store, None).await.unwrap();

        assert!(matches!(session.try_get("counter"), Err(SessionError::MissingKey(key)) if key == "counter"));
        assert_eq!(session.get_or("counter", json!(0)), json!(0));

        session.insert("counter", 5).unwrap();
        assert_eq!(session.try_get("counter").unwrap(), &json!(5));
        assert_eq!(session.get_or("counter", json!(0)), json!(5));
        assert_eq!(session.get_as::<u64>("counter").unwrap(), Some(5));
        assert_eq!(session.get_as::<u64>("missing").unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_as_wrong_type_fails() {
        let (_, store) = new_store();
        let mut session = Session::load(store, None).await.unwrap();

        session.insert("name", "visitor").unwrap();

        assert!(matches!(session.get_as::<u64>("name"), Err(SessionError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_insert_and_remove() {
        let (_, store) = new_store();
        let mut session = Session::load(store, None).await.unwrap();

        assert_eq!(session.insert("key", "first").unwrap(), None);
        assert_eq!(session.insert("key", "second").unwrap(), Some(json!("first")));
        assert!(session.contains_key("key"));
        assert_eq!(session.remove("key"), Some(json!("second")));
        assert!(!session.contains_key("key"));
        assert_eq!(session.remove("key"), None);
    }
}
