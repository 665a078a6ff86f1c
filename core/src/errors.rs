use thiserror::Error;

/// Errors raised by a session store backend
#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Errors raised while working with a request's session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] SessionStoreError),

    #[error("Session key not found: {0}")]
    MissingKey(String),

    #[error("Session already saved: {0}")]
    AlreadySaved(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid cookie name: {0:?}")]
    InvalidCookieName(String),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, SessionStoreError>;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
