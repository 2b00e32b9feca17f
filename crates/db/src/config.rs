//! Environment-driven configuration for the backend client.

use secrecy::SecretString;
use thiserror::Error;

/// Environment variable holding the backend's Postgres connection URL.
pub const BACKEND_URL_VAR: &str = "KB_BACKEND_URL";

/// Environment variable holding the publishable key that identifies this
/// application to the backend.
pub const BACKEND_PUBLIC_KEY_VAR: &str = "KB_BACKEND_PUBLIC_KEY";

/// Default maximum connections in the pool.
/// Can be overridden via the `KB_PG_MAX_CONNECTIONS` environment variable.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Connection settings for the hosted backend.
///
/// Both values are required; [`BackendConfig::from_env`] fails construction
/// rather than proceeding with a partial configuration.
#[derive(Debug)]
pub struct BackendConfig {
    pub backend_url: String,
    pub public_key: SecretString,
}

impl BackendConfig {
    pub fn new(backend_url: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            public_key: SecretString::from(public_key.into()),
        }
    }

    /// Reads the required settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url = require_var(BACKEND_URL_VAR)?;
        let public_key = require_var(BACKEND_PUBLIC_KEY_VAR)?;
        Ok(Self::new(backend_url, public_key))
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

/// Gets the maximum number of pool connections from the environment.
///
/// Reads `KB_PG_MAX_CONNECTIONS`; if unset or invalid, returns the default
/// of 10 connections.
pub fn get_max_connections() -> u32 {
    std::env::var("KB_PG_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_MAX_CONNECTIONS)
}
