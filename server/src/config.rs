//! Startup configuration.
//!
//! # Design
//! Settings come from a YAML file and may be overridden per key by `APP_*`
//! environment variables (`APP_SERVER_PORT`, `APP_DATABASE_HOST`, ...). The
//! result is validated once and then passed by reference to whatever needs
//! it; nothing reads configuration after startup.
//!
//! Environment lookup is a parameter of [`Config::apply_overrides`] so tests
//! can supply variables without touching the process environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SEARCH_PATHS: [&str; 2] = ["config/config.yaml", "config.yaml"];
const SSL_MODES: [&str; 6] = ["disable", "allow", "prefer", "require", "verify-ca", "verify-full"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file found (searched: {0})")]
    NotFound(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(deserialize_with = "port_string")]
    pub port: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(deserialize_with = "port_string")]
    pub port: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub dbname: String,
    #[serde(default = "default_sslmode")]
    pub sslmode: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Ports may be written as `"5432"` or `5432` in the file.
fn port_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(u64),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Text(text) => text,
        Port::Number(number) => number.to_string(),
    })
}

fn default_sslmode() -> String {
    "disable".to_string()
}

fn default_max_connections() -> u32 {
    10
}

impl Config {
    /// Load from the file named by `APP_CONFIG`, or the first of
    /// `config/config.yaml` and `config.yaml` that exists, then apply `APP_*`
    /// overrides from the process environment (a `.env` file is honored).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let path = match std::env::var("APP_CONFIG") {
            Ok(path) => PathBuf::from(path),
            Err(_) => find_config_file()?,
        };
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace keys for which `lookup` returns a value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = &mut self.database;
        let strings: [(&str, &mut String); 7] = [
            ("APP_SERVER_PORT", &mut self.server.port),
            ("APP_DATABASE_HOST", &mut db.host),
            ("APP_DATABASE_PORT", &mut db.port),
            ("APP_DATABASE_USER", &mut db.user),
            ("APP_DATABASE_PASSWORD", &mut db.password),
            ("APP_DATABASE_DBNAME", &mut db.dbname),
            ("APP_DATABASE_SSLMODE", &mut db.sslmode),
        ];
        for (key, slot) in strings {
            if let Some(value) = lookup(key) {
                *slot = value;
            }
        }

        if let Some(value) = lookup("APP_DATABASE_MAX_CONNECTIONS") {
            db.max_connections = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "database.max_connections",
                value,
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.port()?;
        self.database.port()?;
        if !SSL_MODES.contains(&self.database.sslmode.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "database.sslmode",
                value: self.database.sslmode.clone(),
            });
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "database.max_connections",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

impl ServerConfig {
    pub fn port(&self) -> Result<u16, ConfigError> {
        parse_port("server.port", &self.port)
    }
}

impl DatabaseConfig {
    pub fn port(&self) -> Result<u16, ConfigError> {
        parse_port("database.port", &self.port)
    }
}

fn parse_port(key: &'static str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn find_config_file() -> Result<PathBuf, ConfigError> {
    DEFAULT_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
        .ok_or_else(|| ConfigError::NotFound(DEFAULT_SEARCH_PATHS.join(", ")))
}
