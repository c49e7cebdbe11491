use crate::error::ConfigError;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

/// Where the HTTP listener binds.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Contains parameters for the relational store and its connection pool.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// A sqlx connection URL, e.g. `sqlite://tracklist.db` or `sqlite::memory:`.
    pub url: String,
    pub max_connections: u32,
    /// How long a request may wait for a pooled connection.
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub filter: String,
    /// When set, logs go to a daily rolling file in this directory instead of stdout.
    #[serde(default)]
    pub directory: Option<String>,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("invalid server address: {e}")))
    }
}

impl DatabaseSettings {
    /// Settings for a private in-memory store. A single connection keeps every
    /// query on the same database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 5,
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url must be set".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}
