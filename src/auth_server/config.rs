use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use thiserror::Error;

/// Environment variable naming the server configuration file
pub const CONFIG_ENV_VAR: &str = "SIGAUTH_CONFIG";

/// Configuration file used when neither a path nor the env var is given
pub const DEFAULT_CONFIG_PATH: &str = "config/server_config.json";

/// Errors while loading the server configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Configuration for the authentication server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Default log level; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Set the listening port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `host:port` for the HTTP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Load a server configuration from the given path or from the
/// `SIGAUTH_CONFIG` environment variable.
///
/// A missing file yields the default [`ServerConfig`]. A `port` given here
/// overrides whatever the file says.
pub fn load_server_config(
    path: Option<&str>,
    port: Option<u16>,
) -> Result<ServerConfig, ConfigError> {
    let config_path = path
        .map(|p| p.to_string())
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut config = match fs::read_to_string(&config_path) {
        Ok(config_str) => serde_json::from_str::<ServerConfig>(&config_str).map_err(|e| {
            log::error!("Failed to parse server configuration: {}", e);
            ConfigError::Parse {
                path: config_path.clone(),
                source: e,
            }
        })?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("No config at {}, using defaults", config_path);
            ServerConfig::default()
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: config_path,
                source: e,
            })
        }
    };

    if let Some(port) = port {
        config = config.with_port(port);
    }
    Ok(config)
}
