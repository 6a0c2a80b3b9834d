//! Module configuration.
//!
//! Layered as defaults -> YAML file -> environment. Environment keys use the
//! `CLIENT_APP_REGISTRY__` prefix with `__` as the section separator, e.g.
//! `CLIENT_APP_REGISTRY__CATALOG__BASE_URL=http://core:9080` sets
//! `catalog.base_url`.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use tracing::Level;

pub const ENV_PREFIX: &str = "CLIENT_APP_REGISTRY__";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientAppRegistryConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default = "default_logging_config")]
    pub logging: LoggingConfig,
}

impl Default for ClientAppRegistryConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            logging: default_logging_config(),
        }
    }
}

impl ClientAppRegistryConfig {
    /// Load defaults, then `path`, then the environment.
    ///
    /// # Errors
    /// Returns an error if the file cannot be parsed or a value has the
    /// wrong shape.
    pub fn load_layered(path: &Path) -> Result<Self> {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    /// Load from `path` when given, otherwise from defaults and the
    /// environment only.
    ///
    /// # Errors
    /// Returns an error if `path` is not a file or loading fails.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            ensure!(
                path.is_file(),
                "config file does not exist: {}",
                path.display()
            );
            return Self::load_layered(path);
        }

        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to load config from environment")
    }
}

/// Connection settings for the remote client app catalog.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Catalog base URL, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Probed during bootstrap; any 2xx marks the catalog ready.
    #[serde(default = "default_health_path")]
    pub health_path: String,
    #[serde(default = "default_bootstrap_retry_interval_ms")]
    pub bootstrap_retry_interval_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            health_path: default_health_path(),
            bootstrap_retry_interval_ms: default_bootstrap_retry_interval_ms(),
        }
    }
}

impl CatalogConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub const fn bootstrap_retry_interval(&self) -> Duration {
        Duration::from_millis(self.bootstrap_retry_interval_ms)
    }
}

impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("health_path", &self.health_path)
            .field(
                "bootstrap_retry_interval_ms",
                &self.bootstrap_retry_interval_ms,
            )
            .finish()
    }
}

fn default_base_url() -> String {
    "http://localhost:9080/syncope/rest".to_owned()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_health_path() -> String {
    "/wa/clientApps".to_owned()
}

const fn default_bootstrap_retry_interval_ms() -> u64 {
    5_000
}

/// Logging sections keyed by target. `"default"` covers every target
/// without a section of its own.
pub type LoggingConfig = HashMap<String, Section>;

mod level_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::Level;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(level: &Option<Level>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(level.as_ref().map_or("off", Level::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Level>, D::Error> {
        let raw = String::deserialize(d)?;
        match raw.to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(None),
            other => other
                .parse::<Level>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid level: {raw}"))),
        }
    }

    #[allow(clippy::unnecessary_wraps)]
    pub fn info() -> Option<Level> {
        Some(Level::INFO)
    }
}

/// Per-target logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    #[serde(default = "level_serde::info", with = "level_serde")]
    pub console_level: Option<Level>,
    /// Log file, relative to the logging base directory unless absolute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default = "level_serde::info", with = "level_serde")]
    pub file_level: Option<Level>,
    #[serde(default)]
    pub max_age_days: Option<u32>,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

impl Section {
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref().filter(|f| !f.is_empty())
    }
}

#[must_use]
pub fn default_logging_config() -> LoggingConfig {
    HashMap::from([(
        "default".to_owned(),
        Section {
            console_level: Some(Level::INFO),
            file: Some("logs/client-app-registry.log".to_owned()),
            file_level: Some(Level::DEBUG),
            max_age_days: Some(7),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    )])
}
