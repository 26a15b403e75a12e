//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file path
    pub database_path: String,

    /// How long a single outbound notification may take before it is
    /// abandoned (the order itself is never affected)
    pub notify_timeout: Duration,

    /// Maximum orders returned by the admin listing
    pub admin_orders_limit: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./comanda.db".to_string()),

            notify_timeout: Duration::from_secs(
                env::var("NOTIFY_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("NOTIFY_TIMEOUT_SECS".to_string()))?,
            ),

            admin_orders_limit: env::var("ADMIN_ORDERS_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ADMIN_ORDERS_LIMIT".to_string()))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only exercised when the variables are unset, which is the normal
        // test environment.
        if env::var("PORT").is_err() {
            let config = ApiConfig::load().unwrap();
            assert_eq!(config.port, 3000);
            assert_eq!(config.admin_orders_limit, 50);
            assert_eq!(config.notify_timeout, Duration::from_secs(10));
        }
    }
}
