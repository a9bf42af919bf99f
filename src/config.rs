//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

/// Which store implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Settings consulted while handling requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Instance type used when a create request names none
    pub default_instance_type: String,

    /// Virtual controllers requested for each new array
    pub vc_count: i32,

    /// Upper bound on list page size
    pub max_limit: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            default_instance_type: "m1.small".to_string(),
            vc_count: 1,
            max_limit: 1000,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,

    /// Database connection URL, required for the postgres backend
    pub database_url: Option<String>,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    pub api: ApiSettings,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_backend = match lookup("STORAGE_BACKEND").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(_) => return Err(ConfigError::InvalidValue("STORAGE_BACKEND")),
        };

        let database_url = lookup("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnv("DATABASE_URL"));
        }

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let defaults = ApiSettings::default();

        let default_instance_type =
            lookup("DEFAULT_VSA_INSTANCE_TYPE").unwrap_or(defaults.default_instance_type);
        if default_instance_type.trim().is_empty() {
            return Err(ConfigError::InvalidValue("DEFAULT_VSA_INSTANCE_TYPE"));
        }

        let vc_count = match lookup("VSA_VC_COUNT") {
            Some(value) => value
                .parse::<i32>()
                .ok()
                .filter(|count| *count > 0)
                .ok_or(ConfigError::InvalidValue("VSA_VC_COUNT"))?,
            None => defaults.vc_count,
        };

        let max_limit = match lookup("OSAPI_MAX_LIMIT") {
            Some(value) => value
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidValue("OSAPI_MAX_LIMIT"))?,
            None => defaults.max_limit,
        };

        Ok(Self {
            storage_backend,
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            api: ApiSettings {
                default_instance_type,
                vc_count,
                max_limit,
            },
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
