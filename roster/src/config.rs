//! Configuration management using Figment
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. `roster.toml` in the working directory (or the file named by `ROSTER_CONFIG`)
//! 3. `MONGO_URI`, mapped onto `store.uri`
//! 4. `ROSTER_*` environment variables, with `__` separating nested keys
//!    (`ROSTER_LIMITS__LIST_CAP=50`, `ROSTER_STORE__BACKEND=memory`)

use std::{fmt, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub limits: LimitsConfig,
    /// Tracing filter directive, overridden by `RUST_LOG`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            limits: LimitsConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path prefix all routes are mounted under. Empty or `/` mounts at the root.
    pub prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            prefix: "/api".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    MongoDb,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::MongoDb => write!(f, "mongodb"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Connection string; required for the MongoDB backend.
    pub uri: Option<String>,
    pub database: String,
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::MongoDb,
            uri: None,
            database: "Students".to_string(),
            collection: "student_detail".to_string(),
        }
    }
}

// Connection strings routinely embed credentials.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("uri", &self.uri.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum number of students a listing returns.
    pub list_cap: usize,
    /// Upper bound on a single store call, in milliseconds.
    pub store_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            list_cap: 100,
            store_timeout_ms: 5_000,
        }
    }
}

impl LimitsConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Config {
    /// Load configuration from the default file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("ROSTER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        Self::from_figment(Self::figment(&path))
    }

    /// The provider stack used by [`Config::load`], reading the given file.
    pub fn figment(path: &str) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::raw().only(&["MONGO_URI"]).map(|_| "store.uri".into()))
            .merge(Env::prefixed("ROSTER_").split("__"))
    }

    /// Extract and validate a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.list_cap == 0 {
            return Err(ConfigError::Invalid("limits.list_cap must be at least 1".to_string()));
        }
        if self.limits.store_timeout_ms == 0 {
            return Err(ConfigError::Invalid("limits.store_timeout_ms must be at least 1".to_string()));
        }
        if self.store.backend == BackendKind::MongoDb
            && self.store.uri.as_deref().is_none_or(str::is_empty)
        {
            return Err(ConfigError::Invalid(
                "store.uri (or MONGO_URI) is required for the mongodb backend".to_string(),
            ));
        }

        Ok(())
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
