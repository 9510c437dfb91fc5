//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Complete configuration for a tavola process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub writes: WritePolicy,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    InMemory,
    Mongodb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Connection string; only read by the mongodb backend
    pub uri: String,
    pub database: String,
    /// Deadline applied to every store call
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::InMemory,
            uri: "mongodb://localhost:27017".to_string(),
            database: "restaurant".to_string(),
            timeout_secs: 100,
        }
    }
}

impl StoreConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How partial updates behave when no record matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WritePolicy {
    /// Create a record holding only the patched fields when none matches
    pub upsert_on_update: bool,
}

impl Default for WritePolicy {
    fn default() -> Self {
        Self {
            upsert_on_update: true,
        }
    }
}

impl WritePolicy {
    /// Updates report NotFound instead of creating records
    pub fn strict() -> Self {
        Self {
            upsert_on_update: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `tavola=debug,tower_http=info`
    pub filter: String,
    /// Emit one JSON object per event instead of human-readable lines
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "tavola=info,tower_http=info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any variable source
    ///
    /// `TAVOLA_BIND` wins over `PORT` when both are set.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {}", port))?;
            self.server.bind.set_port(port);
        }
        if let Some(bind) = lookup("TAVOLA_BIND") {
            self.server.bind = bind
                .parse()
                .with_context(|| format!("TAVOLA_BIND is not a socket address: {}", bind))?;
        }
        if let Some(uri) = lookup("MONGODB_URL") {
            self.store.uri = uri;
            self.store.backend = StoreBackend::Mongodb;
        }
        if let Some(database) = lookup("TAVOLA_DATABASE") {
            self.store.database = database;
        }
        if let Some(secs) = lookup("TAVOLA_STORE_TIMEOUT_SECS") {
            self.store.timeout_secs = secs
                .parse()
                .with_context(|| format!("TAVOLA_STORE_TIMEOUT_SECS is not a number: {}", secs))?;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.logging.filter = filter;
        }
        Ok(self)
    }
}
