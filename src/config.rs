//! Configuration handed to entities at construction time.
//!
//! Loaded from `config.{env}.yaml` (searched in `.`, `./config` and
//! `../config`) with `DOCSTATE__*` environment variables layered on top,
//! e.g. `DOCSTATE__DATA_STORE__DATABASE_NAME=shop`. The core only reads the
//! values; validation and connection handling belong to the store.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::codec::Encoding;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub logging: LoggingConfig,
    pub data_store: DataStoreConfig,
    pub snapshot: SnapshotConfig,
    pub categories: CategoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. `info` or `docstate=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Connection details of the backing document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataStoreConfig {
    pub uri: String,
    pub database_name: String,
    pub timeout_secs: u64,
}

impl Default for DataStoreConfig {
    fn default() -> Self {
        DataStoreConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database_name: "docstate".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Encoding used for dirty comparison, baselines and `serialize()`.
    pub encoding: Encoding,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub root_parent: RootParent,
}

/// What the first category of a materialized chain stores as its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootParent {
    /// The root points at itself; compatible with existing stored chains.
    #[default]
    SelfReference,
    /// The root carries no parent.
    Detached,
}

const ENV_PREFIX: &str = "DOCSTATE";

impl ModelConfig {
    /// Load configuration for the environment named by `APP_ENV` (default `development`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "development".to_string());
        Self::load(&env)
    }

    /// Load `config.{env}` from the standard search paths plus environment overrides.
    /// Missing files fall back to defaults.
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let name = format!("config.{}", env);
        let builder = Config::builder()
            .add_source(File::with_name(&format!("../config/{}", name)).required(false))
            .add_source(File::with_name(&format!("config/{}", name)).required(false))
            .add_source(File::with_name(&name).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        builder.build()?.try_deserialize()
    }

    /// Load from an explicit file; the file must exist.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }
}
