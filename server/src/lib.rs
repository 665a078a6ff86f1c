//! HTTP side of the session demo: the tower middleware that attaches a
//! [`session_core::Session`] to every request, the visit counter app built on
//! top of it, and the server bootstrap.

pub mod app;
pub mod config;
pub mod error;
pub mod http_server;
pub mod middleware;

pub use error::ApiError;
pub use middleware::{SessionHandle, SessionLayer, SessionService};
