//! Configuration loading and management.
//!
//! Resolution order (first found wins for the file, then overrides apply):
//! 1. Explicit path (`--config`)
//! 2. `KANBAN_CONFIG_PATH`
//! 3. `./kanban/config.yaml`
//! 4. `~/.kanban/config.yaml`
//! 5. Built-in defaults
//!
//! ## Environment Variables
//! - `KANBAN_CONFIG_PATH` - Explicit config file
//! - `KANBAN_DB_PATH` - Database path
//! - `KANBAN_HOST` - Listen address
//! - `KANBAN_PORT` - Listen port

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default port for the HTTP API.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid value for {var}: {value}")]
    Env { var: &'static str, value: String },
}

/// Server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub board: BoardConfig,
}

/// Server-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address to listen on.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("kanban/kanban.db")
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Board behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Columns created with every new board, in order.
    #[serde(default = "default_columns")]
    pub default_columns: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_columns: default_columns(),
        }
    }
}

fn default_columns() -> Vec<String> {
    vec!["To Do".to_string(), "Doing".to_string(), "Done".to_string()]
}

impl Config {
    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Candidate config files, highest priority first.
    pub fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(path) = explicit {
            paths.push(path.to_path_buf());
        }
        if let Ok(path) = std::env::var("KANBAN_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }
        paths.push(PathBuf::from("kanban/config.yaml"));
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".kanban").join("config.yaml"));
        }
        paths
    }

    /// Load from the first existing candidate file (or defaults), then apply
    /// environment overrides. Returns the config and the file it came from.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit
            && !path.exists()
        {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }

        let found = Self::search_paths(explicit)
            .into_iter()
            .find(|path| path.is_file());

        let mut config = match &found {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok((config, found))
    }

    /// Apply `KANBAN_*` overrides using the given variable lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = lookup("KANBAN_DB_PATH") {
            self.server.db_path = PathBuf::from(db_path);
        }

        if let Some(host) = lookup("KANBAN_HOST") {
            self.server.host = host.parse().map_err(|_| ConfigError::Env {
                var: "KANBAN_HOST",
                value: host.clone(),
            })?;
        }

        if let Some(port) = lookup("KANBAN_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::Env {
                var: "KANBAN_PORT",
                value: port.clone(),
            })?;
        }

        Ok(())
    }

    /// Socket address the HTTP server binds to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.server.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
