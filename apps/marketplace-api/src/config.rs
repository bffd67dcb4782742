//! Application configuration loaded from environment variables.
//!
//! Fail-fast: required variables must be present and valid or the server
//! refuses to start with a clear message.

use std::env;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    /// A variable is present but invalid.
    #[error("Invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Base URL of the backing store's REST surface.
    pub store_url: String,
    /// Service key authorizing store access.
    pub store_service_key: String,
    /// Secret used to sign access tokens.
    pub jwt_secret: String,
    /// Log filter (RUST_LOG syntax).
    pub rust_log: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid variable encountered.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match env::var("PORT") {
            Err(_) => 8080,
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
        };

        let store_url = require("STORE_URL")?;
        let store_service_key = require("STORE_SERVICE_KEY")?;

        let jwt_secret = require("JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: "must be at least 32 bytes".to_string(),
            });
        }

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            host,
            port,
            store_url,
            store_service_key,
            jwt_secret,
            rust_log,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_error_names_the_variable() {
        let err = ConfigError::Missing("STORE_URL");
        assert!(err.to_string().contains("STORE_URL"));
    }

    #[test]
    fn test_invalid_value_error_carries_reason() {
        let err = ConfigError::Invalid {
            name: "PORT",
            reason: "invalid digit".to_string(),
        };
        assert!(err.to_string().contains("PORT"));
        assert!(err.to_string().contains("invalid digit"));
    }
}
