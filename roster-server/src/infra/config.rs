//! Layered configuration loading.
//!
//! Values resolve in order: built-in defaults, then an optional TOML file,
//! then environment variables. A `.env` file is honored when present; a
//! missing one is not an error.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("roster.toml"),
        PathBuf::from("config/roster.toml"),
    ]
});

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL. Required to boot the server; absent in
    /// test configurations that run on the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: DEFAULT_MAX_CONNECTIONS,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: FileServerConfig,
    #[serde(default)]
    database: FileDatabaseConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileServerConfig {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileDatabaseConfig {
    url: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Default)]
struct EnvConfig {
    host: Option<String>,
    port: Option<String>,
    database_url: Option<String>,
    max_connections: Option<String>,
}

impl EnvConfig {
    fn gather() -> Self {
        Self {
            host: env::var("SERVER_HOST").ok(),
            port: env::var("SERVER_PORT").ok(),
            database_url: env::var("DATABASE_URL").ok(),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS").ok(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<Config, ConfigLoadError> {
        match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| ()).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(()),
                _ => Err(err),
            })?,
            None => dotenvy::dotenv().map(|_| ()).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(()),
                _ => Err(err),
            })?,
        }

        let env_config = EnvConfig::gather();
        let file_config = self.load_file_config()?;

        resolve(file_config, env_config)
    }

    fn load_file_config(&self) -> Result<FileConfig, ConfigLoadError> {
        let path = match &self.options.config_path {
            Some(path) => Some(path.clone()),
            None => DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
                .cloned(),
        };

        let Some(path) = path else {
            return Ok(FileConfig::default());
        };

        parse_file_config(&path)
    }
}

fn parse_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&raw).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Environment variables win over file values, which win over defaults.
fn resolve(file: FileConfig, env: EnvConfig) -> Result<Config, ConfigLoadError> {
    let port = env
        .port
        .map(|raw| {
            raw.parse::<u16>().map_err(|_| ConfigLoadError::InvalidEnv {
                key: "SERVER_PORT",
                value: raw,
            })
        })
        .transpose()?;

    let max_connections = env
        .max_connections
        .map(|raw| {
            raw.parse::<u32>().map_err(|_| ConfigLoadError::InvalidEnv {
                key: "DATABASE_MAX_CONNECTIONS",
                value: raw,
            })
        })
        .transpose()?;

    Ok(Config {
        server: ServerConfig {
            host: env
                .host
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: port.or(file.server.port).unwrap_or(DEFAULT_PORT),
        },
        database: DatabaseConfig {
            url: env.database_url.or(file.database.url),
            max_connections: max_connections
                .or(file.database.max_connections)
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        },
    })
}
