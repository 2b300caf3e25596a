//! File and environment configuration for the server and the player client.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Environment variable overriding [`ServerConfig::database_url`].
pub const DATABASE_URL_ENV: &str = "LOGIC_MAZE_DATABASE_URL";

/// Environment variable overriding [`ClientConfig::server_url`].
pub const SERVER_URL_ENV: &str = "LOGIC_MAZE_SERVER_URL";

/// Top-level configuration file.
///
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 8080
/// database_url = "results.db"
///
/// [client]
/// server_url = "http://localhost:8080"
/// step_delay_ms = 150
/// ```
#[derive(Debug, Clone, Default, PartialEq, Getters, Serialize, Deserialize)]
pub struct Config {
    /// Results server settings.
    #[serde(default)]
    server: ServerConfig,

    /// Player client settings.
    #[serde(default)]
    client: ClientConfig,
}

/// Results server settings.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// SQLite database file (created if missing).
    #[serde(default = "default_database_url")]
    database_url: String,
}

/// Player client settings.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the results server.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Pause between replayed snapshots, in milliseconds.
    #[serde(default = "default_step_delay_ms")]
    step_delay_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "logic_maze.db".to_string()
}

fn default_server_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_step_delay_ms() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            step_delay_ms: default_step_delay_ms(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Missing tables and keys fall back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(
            host = %config.server.host,
            port = config.server.port,
            server_url = %config.client.server_url,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads the file when given, otherwise starts from defaults, then
    /// applies environment overrides.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies overrides from an environment lookup.
    ///
    /// Empty values are ignored.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(key = DATABASE_URL_ENV, "Overriding database url from environment");
            self.server.database_url = url;
        }
        if let Some(url) = lookup(SERVER_URL_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(key = SERVER_URL_ENV, "Overriding server url from environment");
            self.client.server_url = url;
        }
        self
    }

    /// Applies command-line overrides to the server settings.
    pub fn override_server(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        database_url: Option<String>,
    ) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(database_url) = database_url {
            self.server.database_url = database_url;
        }
        self
    }

    /// Applies command-line overrides to the client settings.
    pub fn override_client(mut self, server_url: Option<String>, step_delay_ms: Option<u64>) -> Self {
        if let Some(server_url) = server_url {
            self.client.server_url = server_url;
        }
        if let Some(step_delay_ms) = step_delay_ms {
            self.client.step_delay_ms = step_delay_ms;
        }
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
