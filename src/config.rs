//! Mesh configuration, loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the stock
//! mesh: `info` logging, the single seeded user and no downstream timeout.

use crate::model::UserRecord;
use crate::user_service::InMemoryUserStore;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MeshConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub user_service: ServiceConfig,
    pub order_service: ServiceConfig,
    /// Upper bound on each user lookup made by the order service.
    pub downstream_timeout_ms: Option<u64>,
    pub users: BTreeMap<String, UserRecord>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    /// Capacity of the request channel in front of the service.
    pub queue_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { queue_size: 1024 }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            user_service: ServiceConfig::default(),
            order_service: ServiceConfig::default(),
            downstream_timeout_ms: None,
            users: BTreeMap::from([(
                "user123".to_string(),
                UserRecord::new("John Doe", "john.doe@example.com"),
            )]),
        }
    }
}

impl MeshConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would panic at startup or fail every request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, service) in [
            ("user_service", &self.user_service),
            ("order_service", &self.order_service),
        ] {
            if service.queue_size == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name}.queue_size must be greater than 0"
                )));
            }
        }
        if self.downstream_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "downstream_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn downstream_timeout(&self) -> Option<Duration> {
        self.downstream_timeout_ms.map(Duration::from_millis)
    }

    pub fn user_store(&self) -> InMemoryUserStore {
        self.users.clone().into_iter().collect()
    }
}
