//! Configuration module for the clinic client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// GraphQL endpoint URL (single endpoint for all operations)
    pub graphql_url: String,
    /// Path where the session token is persisted between runs
    pub token_path: PathBuf,
    /// How long a toast stays visible unless dismissed
    pub toast_duration: Duration,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let graphql_url = env::var("CLINIC_GRAPHQL_URL")
            .unwrap_or_else(|_| "http://localhost:8080/graphql".to_string());

        let token_path = env::var("CLINIC_TOKEN_PATH")
            .unwrap_or_else(|_| "./data/auth_token".to_string())
            .into();

        let toast_ms = env::var("CLINIC_TOAST_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2000);

        let log_level = env::var("CLINIC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            graphql_url,
            token_path,
            toast_duration: Duration::from_millis(toast_ms),
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("CLINIC_GRAPHQL_URL");
        env::remove_var("CLINIC_TOKEN_PATH");
        env::remove_var("CLINIC_TOAST_MS");
        env::remove_var("CLINIC_LOG_LEVEL");

        let config = Config::from_env();

        assert_eq!(config.graphql_url, "http://localhost:8080/graphql");
        assert_eq!(config.token_path, PathBuf::from("./data/auth_token"));
        assert_eq!(config.toast_duration, Duration::from_millis(2000));
        assert_eq!(config.log_level, "info");
    }
}
