//! Process configuration.
//!
//! Read once from the environment at startup. Unset variables fall back to the
//! serde defaults below.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

/// Document store connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Connection string (default: "mongodb://127.0.0.1:27017")
    #[serde(default = "default_mongo_uri")]
    pub uri: String,

    /// Database name (default: "exampleDB")
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection holding student documents (default: "students")
    #[serde(default = "default_collection")]
    pub collection: String,
}

/// HTTP server plus store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Host to bind to (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub store: StoreConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_backend() -> StoreBackend {
    StoreBackend::Mongo
}

fn default_mongo_uri() -> String {
    "mongodb://127.0.0.1:27017".to_string()
}

fn default_database() -> String {
    "exampleDB".to_string()
}

fn default_collection() -> String {
    "students".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            uri: default_mongo_uri(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Builds the config from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = vars.get("STUDENTS_HOST") {
            config.host = host.clone();
        }
        if let Some(port) = vars.get("STUDENTS_PORT") {
            config.port = port.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: "STUDENTS_PORT",
                    value: port.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(backend) = vars.get("STUDENTS_STORE") {
            config.store.backend = match backend.to_ascii_lowercase().as_str() {
                "mongo" | "mongodb" => StoreBackend::Mongo,
                "memory" => StoreBackend::Memory,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "STUDENTS_STORE",
                        value: backend.clone(),
                        reason: "expected `mongo` or `memory`".to_string(),
                    })
                }
            };
        }
        if let Some(uri) = vars.get("MONGODB_URI") {
            config.store.uri = uri.clone();
        }
        if let Some(database) = vars.get("MONGODB_DATABASE") {
            config.store.database = database.clone();
        }
        if let Some(collection) = vars.get("MONGODB_COLLECTION") {
            config.store.collection = collection.clone();
        }

        Ok(config)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::from_vars(HashMap::new()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.socket_addr(), "127.0.0.1:3000");
        assert_eq!(config.store.uri, "mongodb://127.0.0.1:27017");
        assert_eq!(config.store.database, "exampleDB");
        assert_eq!(config.store.backend, StoreBackend::Mongo);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("STUDENTS_HOST", "0.0.0.0"),
            ("STUDENTS_PORT", "8080"),
            ("STUDENTS_STORE", "memory"),
            ("MONGODB_COLLECTION", "pupils"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.collection, "pupils");
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_vars(vars(&[("STUDENTS_PORT", "http")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "STUDENTS_PORT",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_backend() {
        assert!(AppConfig::from_vars(vars(&[("STUDENTS_STORE", "redis")])).is_err());
    }
}
