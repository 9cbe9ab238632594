//! Application configuration loaded from environment variables.
//!
//! Required variables must be present and valid, or the server exits with a
//! clear error message before anything else starts.

use std::env;
use thiserror::Error;

use crate::logging::LogFormat;

/// Application environment mode.
///
/// In `Production`, malformed CORS origins refuse startup instead of
/// logging a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    /// Parse from the `APP_ENV` environment variable value.
    /// Defaults to `Development` if unrecognized.
    pub fn from_env_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => {
                tracing::warn!(
                    value = other,
                    "Unrecognized APP_ENV value, defaulting to Development"
                );
                Self::Development
            }
        }
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Failed to parse port: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Application environment (development or production).
    pub app_env: AppEnvironment,

    /// PostgreSQL connection string
    pub database_url: String,

    /// Upper bound on pooled database connections
    pub database_max_connections: u32,

    /// Seconds to wait for a pooled connection before failing a request
    pub database_acquire_timeout_secs: u64,

    /// Tracing filter directive (e.g., "info,syncplane_api=debug")
    pub rust_log: String,

    /// Log output format ("json" or "pretty")
    pub log_format: LogFormat,

    /// Allowed CORS origins (comma-separated URLs or "*" for development)
    pub cors_origins: Vec<String>,

    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `DATABASE_URL` is missing or any value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let app_env = AppEnvironment::from_env_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let database_max_connections = parse_positive(
            "DATABASE_MAX_CONNECTIONS",
            env::var("DATABASE_MAX_CONNECTIONS").ok(),
            10,
        )?;
        let database_acquire_timeout_secs = u64::from(parse_positive(
            "DATABASE_ACQUIRE_TIMEOUT_SECS",
            env::var("DATABASE_ACQUIRE_TIMEOUT_SECS").ok(),
            5,
        )?);

        let rust_log =
            env::var("RUST_LOG").unwrap_or_else(|_| "info,syncplane=debug".to_string());

        let log_format = match env::var("LOG_FORMAT") {
            Ok(raw) => LogFormat::from_env_str(&raw).ok_or_else(|| ConfigError::InvalidValue {
                var: "LOG_FORMAT".to_string(),
                message: format!("expected 'json' or 'pretty', got '{raw}'"),
            })?,
            Err(_) => LogFormat::default(),
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|s| parse_origins(&s))
            .unwrap_or_else(|_| vec!["*".to_string()]);
        validate_cors_origins(&cors_origins, &app_env)?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8001".to_string())
            .parse()?;

        if port == 0 {
            return Err(ConfigError::InvalidValue {
                var: "PORT".to_string(),
                message: "Port must be between 1 and 65535".to_string(),
            });
        }

        Ok(Self {
            app_env,
            database_url,
            database_max_connections,
            database_acquire_timeout_secs,
            rust_log,
            log_format,
            cors_origins,
            host,
            port,
        })
    }

    /// Get the server bind address as a socket address string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

fn parse_positive(var: &str, raw: Option<String>, default: u32) -> Result<u32, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: format!("expected a positive integer, got '{raw}'"),
        }),
        Ok(value) => Ok(value),
    }
}

/// Validate CORS origin URL formats.
fn validate_cors_origins(origins: &[String], app_env: &AppEnvironment) -> Result<(), ConfigError> {
    for origin in origins {
        if origin == "*" {
            continue;
        }

        let is_valid = origin.starts_with("http://") || origin.starts_with("https://");
        if !is_valid {
            let msg = format!(
                "CORS origin '{origin}' is not a valid URL (must start with http:// or https://)"
            );
            if app_env.is_production() {
                return Err(ConfigError::InvalidValue {
                    var: "CORS_ORIGINS".to_string(),
                    message: msg,
                });
            }
            tracing::warn!(origin = %origin, "{}", msg);
        }

        if is_valid && origin.ends_with('/') {
            tracing::warn!(origin = %origin, "CORS origin has a trailing slash");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            app_env: AppEnvironment::Development,
            database_url: "postgres://localhost/syncplane".to_string(),
            database_max_connections: 10,
            database_acquire_timeout_secs: 5,
            rust_log: "info".to_string(),
            log_format: LogFormat::Json,
            cors_origins: vec!["*".to_string()],
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }

    #[test]
    fn test_bind_addr() {
        assert_eq!(test_config().bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_app_environment_parsing() {
        assert_eq!(AppEnvironment::from_env_str("prod"), AppEnvironment::Production);
        assert_eq!(
            AppEnvironment::from_env_str("PRODUCTION"),
            AppEnvironment::Production
        );
        assert_eq!(AppEnvironment::from_env_str("dev"), AppEnvironment::Development);
        assert_eq!(
            AppEnvironment::from_env_str("staging"),
            AppEnvironment::Development
        );
        assert_eq!(AppEnvironment::Production.to_string(), "production");
    }

    #[test]
    fn test_parse_origins_trims_and_drops_empty() {
        assert_eq!(
            parse_origins("http://a.test, https://b.test,,"),
            vec!["http://a.test".to_string(), "https://b.test".to_string()]
        );
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("X", None, 10).unwrap(), 10);
        assert_eq!(parse_positive("X", Some("25".to_string()), 10).unwrap(), 25);
        assert!(matches!(
            parse_positive("X", Some("0".to_string()), 10),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(parse_positive("X", Some("many".to_string()), 10).is_err());
    }

    #[test]
    fn test_invalid_origin_rejected_in_production_only() {
        let origins = vec!["localhost:3000".to_string()];
        assert!(validate_cors_origins(&origins, &AppEnvironment::Development).is_ok());

        let err = validate_cors_origins(&origins, &AppEnvironment::Production).unwrap_err();
        assert!(err.to_string().contains("CORS_ORIGINS"));
    }

    #[test]
    fn test_wildcard_origin_accepted() {
        let origins = vec!["*".to_string()];
        assert!(validate_cors_origins(&origins, &AppEnvironment::Production).is_ok());
    }
}
