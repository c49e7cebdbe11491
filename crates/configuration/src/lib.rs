use crate::error::ConfigError;
use crate::settings::Config;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, LoggingSettings, ServerSettings};
pub use settings::Config as Settings;

const DEFAULTS: &str = r#"
[server]
host = "127.0.0.1"
port = 3000

[database]
url = "sqlite://tracklist.db"
max_connections = 10
acquire_timeout_secs = 5

[logging]
filter = "info,tower_http=debug"
"#;

/// Loads the application configuration.
///
/// Sources are layered from lowest to highest precedence: built-in defaults,
/// an optional `config.toml` in the working directory, then environment
/// variables prefixed with `TRACKLIST__` (e.g. `TRACKLIST__SERVER__PORT=8080`).
/// A `DATABASE_URL` variable overrides `database.url`; binaries load `.env`
/// before calling this.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from("config.toml", std::env::var("DATABASE_URL").ok())
}

/// Same as [`load_config`] with an explicit file path and database URL override.
pub fn load_config_from(path: &str, database_url: Option<String>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml))
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("TRACKLIST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("database.url", database_url)?
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path, "Configuration loaded.");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        let config = load_config_from("does-not-exist.toml", None).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 10);
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn database_url_override_wins() {
        let config =
            load_config_from("does-not-exist.toml", Some("sqlite::memory:".to_string())).unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn zero_connections_is_rejected() {
        let mut config = load_config_from("does-not-exist.toml", None).unwrap();
        config.database.max_connections = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = load_config_from("does-not-exist.toml", None).unwrap();
        assert_eq!(config.server.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }
}
