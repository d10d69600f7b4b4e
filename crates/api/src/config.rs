//! Process configuration, read from environment variables.
//!
//! | Variable        | Default        | Meaning                              |
//! |-----------------|----------------|--------------------------------------|
//! | `BIND_ADDR`     | `0.0.0.0:8080` | listen address                       |
//! | `STORE_BACKEND` | `memory`       | `memory` or `postgres`               |
//! | `DATABASE_URL`  | none           | required when `STORE_BACKEND=postgres` |

use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BIND_ADDR {0:?} is not a valid socket address")]
    InvalidBindAddr(String),
    #[error("STORE_BACKEND {0:?} is not one of: memory, postgres")]
    UnknownBackend(String),
    #[error("DATABASE_URL must be set when STORE_BACKEND=postgres")]
    MissingDatabaseUrl,
}

/// Which entity store implementation backs the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        let backend = lookup("STORE_BACKEND").unwrap_or_else(|| "memory".to_string());
        let store = match backend.trim().to_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres {
                database_url: lookup("DATABASE_URL")
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(ConfigError::MissingDatabaseUrl)?,
            },
            _ => return Err(ConfigError::UnknownBackend(backend)),
        };

        Ok(Self { bind_addr, store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_in_memory_on_port_8080() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.store, StoreBackend::Memory);
    }

    #[test]
    fn postgres_requires_database_url() {
        assert_eq!(
            config(&[("STORE_BACKEND", "postgres")]),
            Err(ConfigError::MissingDatabaseUrl)
        );

        let cfg = config(&[
            ("STORE_BACKEND", "Postgres"),
            ("DATABASE_URL", "postgres://localhost/bookstore"),
        ])
        .unwrap();
        assert_eq!(
            cfg.store,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/bookstore".to_string()
            }
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config(&[("BIND_ADDR", "nope")]),
            Err(ConfigError::InvalidBindAddr("nope".to_string()))
        );
        assert_eq!(
            config(&[("STORE_BACKEND", "redis")]),
            Err(ConfigError::UnknownBackend("redis".to_string()))
        );
    }
}
