//! Configuration module
//!
//! Loads configuration from environment variables.

use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Payments above this amount are declined by the simulated gateway
    pub gateway_decline_above: Decimal,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let gateway_decline_above = parse_amount(
            "GATEWAY_DECLINE_ABOVE",
            &env::var("GATEWAY_DECLINE_ABOVE").unwrap_or_else(|_| "1000.00".to_string()),
        )?;

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            gateway_decline_above,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_amount(name: &'static str, raw: &str) -> Result<Decimal, ConfigError> {
    match Decimal::from_str(raw.trim()) {
        Ok(amount) if amount > Decimal::ZERO => Ok(amount),
        _ => Err(ConfigError::InvalidValue(name)),
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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("X", "250.00").unwrap(), dec!(250.00));
        assert_eq!(parse_amount("X", " 5 ").unwrap(), dec!(5));
        assert!(matches!(parse_amount("X", "0"), Err(ConfigError::InvalidValue("X"))));
        assert!(parse_amount("X", "lots").is_err());
    }
}
