//! Gym POS configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                      | Default      |
//! |-------------------------------|--------------|
//! | `GYM_DATABASE_PATH`           | `gym-pos.db` |
//! | `GYM_DB_MAX_CONNECTIONS`      | `5`          |
//! | `GYM_DB_CONNECT_TIMEOUT_SECS` | `30`         |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::pool::DbConfig;

/// Gym POS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size upper bound
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub connect_timeout_secs: u64,
}

impl GymConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = GymConfig {
            database_path: lookup("GYM_DATABASE_PATH")
                .unwrap_or_else(|| "gym-pos.db".to_string())
                .into(),

            max_connections: lookup("GYM_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("GYM_DB_MAX_CONNECTIONS".to_string()))?,

            connect_timeout_secs: lookup("GYM_DB_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("GYM_DB_CONNECT_TIMEOUT_SECS".to_string())
                })?,
        };

        if config.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("GYM_DATABASE_PATH".to_string()));
        }
        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("GYM_DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GymConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("gym-pos.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    fn test_overrides_flow_into_db_config() {
        let config = GymConfig::from_lookup(lookup(&[
            ("GYM_DATABASE_PATH", "/var/lib/gym/pos.db"),
            ("GYM_DB_MAX_CONNECTIONS", "8"),
            ("GYM_DB_CONNECT_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        let db = config.db_config();
        assert_eq!(db.database_path, PathBuf::from("/var/lib/gym/pos.db"));
        assert_eq!(db.max_connections, 8);
        assert_eq!(db.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values() {
        let err = GymConfig::from_lookup(lookup(&[("GYM_DB_MAX_CONNECTIONS", "lots")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for GYM_DB_MAX_CONNECTIONS");

        assert!(GymConfig::from_lookup(lookup(&[("GYM_DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(GymConfig::from_lookup(lookup(&[("GYM_DATABASE_PATH", "")])).is_err());
    }
}
