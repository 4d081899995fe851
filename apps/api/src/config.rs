//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults; `.env` files are honored in `main`.

use serde::{Deserialize, Serialize};
use std::env;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Secret key for signing session tokens
    pub jwt_secret: String,

    /// Session token lifetime in seconds (default: 24 hours)
    pub token_ttl_secs: i64,

    /// Store code stamped on transaction headers
    pub store_cd: String,

    /// POS terminal number stamped on transaction headers
    pub pos_no: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./vend.db".to_string()),

            jwt_secret: env::var("JWT_SECRET")
                // In production this MUST be set via environment variable.
                .unwrap_or_else(|_| "vend-dev-secret-change-in-production".to_string()),

            token_ttl_secs: env::var("TOKEN_TTL_SECS")
                .unwrap_or_else(|_| "86400".to_string()) // 24 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TOKEN_TTL_SECS".to_string()))?,

            store_cd: env::var("STORE_CD")
                .unwrap_or_else(|_| vend_core::DEFAULT_STORE_CD.to_string()),

            pos_no: env::var("POS_NO").unwrap_or_else(|_| vend_core::DEFAULT_POS_NO.to_string()),
        };

        if config.token_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue("TOKEN_TTL_SECS".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}")]
    InvalidValue(String),
}
