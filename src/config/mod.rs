mod format;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use format::VerbatimIni;

/// Location of the INI file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "ini/connexion.ini";

/// Prefix for environment overrides, e.g. `CONNEXION_POSTGRES__PASSWORD`.
pub const ENV_PREFIX: &str = "connexion";

/// `[postgres]` section. Values are kept exactly as written; nothing is
/// validated until the driver consumes them.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: String,
    pub database: String,
}

/// `[sys-path]` section.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SysPathConfig {
    pub proximities: PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 0,
            acquire_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: num_cpus::get() as u32,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub postgres: PostgresConfig,
    #[serde(rename = "sys-path")]
    pub sys_path: SysPathConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_path(DEFAULT_CONFIG_PATH)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_sources(path.as_ref(), Self::environment())
    }

    /// Load `path` as INI, then layer `env` on top of it.
    ///
    /// The file is required: a missing file, section or key is an error and no
    /// defaults are substituted for the `postgres` and `sys-path` sections.
    /// Values are taken as written, without unquoting or unescaping.
    pub fn from_sources(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::new(&path.to_string_lossy(), VerbatimIni).required(true))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    // Overrides stay strings; numeric fields are converted on deserialize.
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }
}
