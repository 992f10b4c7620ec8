//! Configuration for the mock emote server.
//!
//! Defaults are layered in increasing precedence: built-in values, an
//! optional TOML file, then the `OPENEMOTE_MOCK_HOST` / `OPENEMOTE_MOCK_PORT`
//! environment variables via [`MockConfig::apply_env_overrides`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;

/// Environment variable overriding the bind host.
pub const HOST_ENV: &str = "OPENEMOTE_MOCK_HOST";

/// Environment variable overriding the bind port.
pub const PORT_ENV: &str = "OPENEMOTE_MOCK_PORT";

/// Top-level mock server configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host (default `127.0.0.1`).
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port (default `18080`).
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    18080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl MockConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        debug!(path = %path.display(), "loaded mock server configuration");
        Ok(config)
    }

    /// Apply `OPENEMOTE_MOCK_HOST` / `OPENEMOTE_MOCK_PORT` overrides.
    ///
    /// An unset or empty variable leaves the current value in place. A port
    /// value that does not parse as a number is a configuration error rather
    /// than a silent fallback.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var(HOST_ENV) {
            if !host.is_empty() {
                debug!(%host, "bind host overridden from environment");
                self.server.host = host;
            }
        }
        if let Ok(port) = std::env::var(PORT_ENV) {
            if !port.is_empty() {
                self.server.port =
                    port.parse::<u16>()
                        .map_err(|e| ConfigError::InvalidValue {
                            field: "server.port".into(),
                            detail: format!("{} ({})", e, port),
                        })?;
                debug!(port = self.server.port, "bind port overridden from environment");
            }
        }
        Ok(())
    }

    /// Override host and port from a `host:port` string (e.g. a CLI flag).
    pub fn set_listen(&mut self, listen: &str) -> Result<(), ConfigError> {
        let (host, port) = listen.rsplit_once(':').ok_or_else(|| ConfigError::InvalidValue {
            field: "server.listen".into(),
            detail: format!("expected host:port, got '{}'", listen),
        })?;
        if host.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.listen".into(),
                detail: format!("empty host in '{}'", listen),
            });
        }
        self.server.port = port.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
            field: "server.listen".into(),
            detail: format!("{} ({})", e, port),
        })?;
        self.server.host = host.to_string();
        Ok(())
    }

    /// The address string the listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
