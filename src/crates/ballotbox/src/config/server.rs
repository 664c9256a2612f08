//! Server configuration for ballotbox-server
//!
//! Loads `ballotbox.toml` (all sections optional), then applies environment
//! overrides. Environment variables always win over the file.

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub mod network;

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Server identification and listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfoConfig {
    /// Server name for identification (reported by /health)
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Listen address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerInfoConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_server_name() -> String {
    "ballotbox".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file path
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "data.db".to_string()
}

/// Admin authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Shared admin password (overridden by ADMIN_PASSWORD)
    #[serde(default)]
    pub admin_password: Option<String>,
    /// Cookie signing secret (overridden by SECRET_KEY)
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Admin session lifetime
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            admin_password: None,
            secret_key: None,
            session_ttl_minutes: default_session_ttl(),
        }
    }
}

fn default_session_ttl() -> u64 {
    720
}

/// Voting behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingConfig {
    /// Public base URL embedded in credential QR codes
    #[serde(default)]
    pub base_url: Option<String>,
    /// CIDR range voters must connect from
    #[serde(default)]
    pub allowed_network: Option<String>,
    /// Upper bound on tokens issued per request
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: u32,
    /// Directory for the daily CSV vote logs
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            allowed_network: None,
            max_batch_size: default_max_batch_size(),
            log_dir: default_log_dir(),
        }
    }
}

fn default_max_batch_size() -> u32 {
    500
}

fn default_log_dir() -> String {
    "log".to_string()
}

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server identification
    #[serde(default)]
    pub server: ServerInfoConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Admin authentication
    #[serde(default)]
    pub security: SecurityConfig,
    /// Voting behaviour
    #[serde(default)]
    pub voting: VotingConfig,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ServerConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(ServerConfigError::ReadError)?;
        Self::from_str(&content)
    }

    /// Load configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ServerConfigError> {
        toml::from_str(content).map_err(ServerConfigError::ParseError)
    }

    /// Load configuration from default location and the environment
    ///
    /// Searches for a config file in:
    /// 1. CONFIG_PATH environment variable
    /// 2. ./config/ballotbox.toml
    /// 3. ./ballotbox.toml
    ///
    /// Falls back to built-in defaults when no file exists, then applies
    /// environment overrides and validates the result.
    pub fn load() -> Result<Self, ServerConfigError> {
        let mut config = if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            Self::from_file(config_path)?
        } else {
            let paths = [
                PathBuf::from("config/ballotbox.toml"),
                PathBuf::from("./ballotbox.toml"),
            ];
            match paths.iter().find(|path| path.exists()) {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            }
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ServerConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                ServerConfigError::InvalidConfig(format!("PORT is not a valid port: {}", port))
            })?;
        }
        if let Some(path) = get("DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(password) = get("ADMIN_PASSWORD") {
            self.security.admin_password = Some(password);
        }
        if let Some(secret) = get("SECRET_KEY") {
            self.security.secret_key = Some(secret);
        }
        if let Some(base_url) = get("BASE_URL") {
            self.voting.base_url = Some(base_url);
        }
        if let Some(network) = get("ALLOWED_NETWORK") {
            self.voting.allowed_network = Some(network);
        }
        if let Some(log_dir) = get("LOG_DIR") {
            self.voting.log_dir = log_dir;
        }

        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        if self.admin_password().is_none() {
            return Err(ServerConfigError::InvalidConfig(
                "ADMIN_PASSWORD must be set".to_string(),
            ));
        }
        if self.voting.max_batch_size == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "voting.max_batch_size must be greater than zero".to_string(),
            ));
        }
        if self.security.session_ttl_minutes == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "security.session_ttl_minutes must be greater than zero".to_string(),
            ));
        }
        self.allowed_network()?;
        Ok(())
    }

    /// Configured admin password, if non-empty
    pub fn admin_password(&self) -> Option<&str> {
        self.security
            .admin_password
            .as_deref()
            .filter(|password| !password.is_empty())
    }

    /// Configured cookie secret, if non-empty
    pub fn secret_key(&self) -> Option<&str> {
        self.security
            .secret_key
            .as_deref()
            .filter(|secret| !secret.is_empty())
    }

    /// Parsed voter network restriction
    pub fn allowed_network(&self) -> Result<Option<IpNet>, ServerConfigError> {
        match self.voting.allowed_network.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(cidr) => cidr.parse::<IpNet>().map(Some).map_err(|e| {
                ServerConfigError::InvalidConfig(format!(
                    "ALLOWED_NETWORK is not a valid CIDR range ({}): {}",
                    cidr, e
                ))
            }),
        }
    }

    /// Configured public base URL without a trailing slash
    pub fn base_url(&self) -> Option<&str> {
        self.voting
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }

    /// Listener address in `host:port` form
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
