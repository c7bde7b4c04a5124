//! Process configuration, read once at start-up from the environment.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use tokengate_auth::{SecretError, SigningSecret};
use tokengate_observability::LogFormat;

pub const JWT_SECRET: &str = "JWT_SECRET";
pub const BIND: &str = "TOKENGATE_BIND";
pub const TOKEN_TTL_SECS: &str = "TOKENGATE_TOKEN_TTL_SECS";
pub const LOG_FORMAT: &str = "TOKENGATE_LOG_FORMAT";
pub const SEED_USERS: &str = "TOKENGATE_SEED_USERS";

const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set")]
    MissingSecret,

    #[error("JWT_SECRET is invalid: {0}")]
    InvalidSecret(#[from] SecretError),

    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Fully validated service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: SigningSecret,
    pub bind_addr: SocketAddr,
    pub token_ttl: Duration,
    pub log_format: LogFormat,
    pub seed_users: bool,
}

impl AppConfig {
    /// Defaults for everything except the secret.
    pub fn new(jwt_secret: SigningSecret) -> Self {
        Self {
            jwt_secret,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            log_format: LogFormat::default(),
            seed_users: false,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET).ok_or(ConfigError::MissingSecret)?;
        let jwt_secret = SigningSecret::try_from(secret)?;

        let bind = lookup(BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(BIND, &bind, e.to_string()))?;

        let token_ttl = match lookup(TOKEN_TTL_SECS) {
            None => Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| ConfigError::invalid(TOKEN_TTL_SECS, &raw, e.to_string()))?;
                if secs <= 0 {
                    return Err(ConfigError::invalid(TOKEN_TTL_SECS, &raw, "must be positive"));
                }
                Duration::try_seconds(secs)
                    .ok_or_else(|| ConfigError::invalid(TOKEN_TTL_SECS, &raw, "out of range"))?
            }
        };

        let log_format = match lookup(LOG_FORMAT) {
            None => LogFormat::default(),
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|reason| ConfigError::invalid(LOG_FORMAT, &raw, reason))?,
        };

        let seed_users = match lookup(SEED_USERS) {
            None => false,
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::invalid(SEED_USERS, &raw, "expected true or false"))?,
        };

        Ok(Self {
            jwt_secret,
            bind_addr,
            token_ttl,
            log_format,
            seed_users,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
