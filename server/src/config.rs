use serde::{Deserialize, Serialize};
use session_core::config::{get_default_config_file, load_from_file};
use session_core::{ConfigResult, SessionConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Directory name under `~/.config` holding the server's config file
pub const APP_NAME: &str = "session-demo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http_addr: SocketAddr,
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            http_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file; a missing file yields the defaults
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let config: Self = load_from_file(path)?;
        config.session.validate()?;
        Ok(config)
    }

    pub fn default_path() -> ConfigResult<PathBuf> {
        get_default_config_file(APP_NAME)
    }
}
