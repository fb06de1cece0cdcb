use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Web Server
    pub web_host: String,
    pub web_port: u16,
    pub static_dir: PathBuf,

    // Auth
    pub token_secret: String,
    pub token_ttl: Duration,
    /// Max-Age hint for the session cookie. Sessions themselves never expire.
    pub session_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,
            static_dir: PathBuf::from(env_or_default("STATIC_DIR", "./static")),

            // Auth
            token_secret: required_env("TOKEN_SECRET")?,
            token_ttl: parse_env_hours("TOKEN_TTL_HOURS", 12)?,
            session_ttl: parse_env_hours("SESSION_TTL_HOURS", 24)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "TOKEN_SECRET".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        check_ttl("TOKEN_TTL_HOURS", self.token_ttl)?;
        check_ttl("SESSION_TTL_HOURS", self.session_ttl)?;
        Ok(())
    }
}

/// Ten years.
const MAX_TTL_HOURS: u64 = 10 * 365 * 24;

fn check_ttl(name: &str, ttl: Duration) -> Result<(), ConfigError> {
    if ttl.is_zero() {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    if ttl > Duration::from_secs(MAX_TTL_HOURS * 3600) {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("must be at most {MAX_TTL_HOURS}"),
        });
    }
    Ok(())
}

fn hours(name: &str, n: u64) -> Result<Duration, ConfigError> {
    n.checked_mul(3600)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("{n} hours is out of range"),
        })
}

fn parse_env_hours(name: &str, default: u64) -> Result<Duration, ConfigError> {
    hours(name, parse_env_u64(name, default)?)
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
