//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `timer24h.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.
//!
//! The `[card]` table is not interpreted here: it is handed to the engine as
//! a raw document and validated field by field like any other card
//! configuration.

use std::time::Duration;

use serde::Deserialize;
use timer24h_app::engine::EngineSettings;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Engine timing.
    pub engine: EngineConfig,
    /// Simulated home settings.
    pub home: HomeConfig,
    /// Raw card configuration.
    pub card: toml::Table,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Periods of the engine's background tasks, in seconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub evaluation_interval_secs: u64,
    pub sync_interval_secs: u64,
    pub cleanup_grace_secs: u64,
}

/// The in-memory home the daemon drives.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    /// Start with a live session to the remote stores.
    pub connected: bool,
}

impl Config {
    /// Load configuration from `timer24h.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("timer24h.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("TIMER24H_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("TIMER24H_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("TIMER24H_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("TIMER24H_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("TIMER24H_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.engine.evaluation_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "evaluation interval must be non-zero".to_string(),
            ));
        }
        if self.engine.sync_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "sync interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            evaluation_interval: Duration::from_secs(self.engine.evaluation_interval_secs),
            sync_interval: Duration::from_secs(self.engine.sync_interval_secs),
            cleanup_grace: Duration::from_secs(self.engine.cleanup_grace_secs),
        }
    }

    /// The `[card]` table as the JSON document the engine validates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Card`] if the table holds values JSON cannot
    /// represent.
    pub fn card_document(&self) -> Result<serde_json::Value, ConfigError> {
        serde_json::to_value(&self.card).map_err(ConfigError::Card)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:timer24h.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "timer24hd=info,timer24h_app=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let defaults = EngineSettings::default();
        Self {
            evaluation_interval_secs: defaults.evaluation_interval.as_secs(),
            sync_interval_secs: defaults.sync_interval.as_secs(),
            cleanup_grace_secs: defaults.cleanup_grace.as_secs(),
        }
    }
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self { connected: true }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// The `[card]` table could not be converted.
    #[error("invalid card table")]
    Card(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:timer24h.db?mode=rwc");
        assert_eq!(config.engine.evaluation_interval_secs, 60);
        assert_eq!(config.engine.cleanup_grace_secs, 5);
        assert!(config.home.connected);
        assert!(config.card.is_empty());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [engine]
            evaluation_interval_secs = 10
            sync_interval_secs = 30
            cleanup_grace_secs = 1

            [home]
            connected = false

            [card]
            title = 'Boiler'
            entities = ['switch.boiler']
            home_logic = 'AND'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(
            config.engine_settings().sync_interval,
            Duration::from_secs(30)
        );
        assert!(!config.home.connected);
        assert_eq!(config.card["title"].as_str(), Some("Boiler"));
    }

    #[test]
    fn should_convert_card_table_to_json_document() {
        let toml = "
            [card]
            title = 'Boiler'
            entities = ['switch.boiler', 'light.porch']
            save_state = false
        ";
        let config: Config = toml::from_str(toml).unwrap();
        let document = config.card_document().unwrap();
        assert_eq!(
            document,
            serde_json::json!({
                "title": "Boiler",
                "entities": ["switch.boiler", "light.porch"],
                "save_state": false,
            })
        );
    }

    #[test]
    fn should_convert_empty_card_table_to_empty_object() {
        let document = Config::default().card_document().unwrap();
        assert_eq!(document, serde_json::json!({}));
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_intervals() {
        let mut config = Config::default();
        config.engine.evaluation_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.engine.sync_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_zero_cleanup_grace() {
        let mut config = Config::default();
        config.engine.cleanup_grace_secs = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [server]
            port = 8080
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database_url(), "sqlite:timer24h.db?mode=rwc");
        assert_eq!(config.engine_settings(), EngineSettings::default());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
