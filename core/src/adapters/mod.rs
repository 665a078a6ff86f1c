//! Storage backends for [`SessionStore`](crate::store::SessionStore)

pub mod in_memory;

pub use in_memory::InMemorySessionStore;
