// Core session functionality shared by the middleware and the server:
// - Session identifiers
// - Session data and the store interface
// - Storage backends
// - Per-request session lifecycle
// - Configuration loading and shared error types

pub mod adapters;
pub use adapters::InMemorySessionStore;

pub mod config;
pub use config::{SessionConfig, DEFAULT_COOKIE_NAME};

pub mod errors;
pub use errors::*;

pub mod id;
pub use id::SessionId;

pub mod session;
pub use session::{Session, SessionState};

pub mod store;
pub use store::{SessionData, SessionStore, SessionStoreRef};
