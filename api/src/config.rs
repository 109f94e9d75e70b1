//! Application configuration loaded from environment variables.
//!
//! The configuration is read once in `main` and passed by value into the
//! components that need it. Nothing here is global.

use std::env;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use chrono::Duration;
use thiserror::Error;

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("invalid bind address {0}")]
    InvalidAddr(String),

    #[error("CORS_ALLOWED_ORIGIN is not a valid header value: {0}")]
    InvalidOrigin(String),

    #[error("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes long")]
    WeakSecret,

    #[error("{0} must be positive")]
    NonPositiveTtl(&'static str),

    #[error("JWT_ACCESS_TTL must be shorter than JWT_REFRESH_TTL")]
    TtlOrder,
}

/// Token signing secret and lifetimes.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    /// `None` allows any origin.
    pub cors_allowed_origin: Option<HeaderValue>,
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = var("DATABASE_URL").unwrap_or_else(|| "sqlite:auth.db?mode=rwc".into());
        let database_max_connections = parse_number(&var, "DATABASE_MAX_CONNECTIONS", 5)?;

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_number(&var, "PORT", 8080)?;
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(format!("{host}:{port}")))?;

        let cors_allowed_origin = var("CORS_ALLOWED_ORIGIN")
            .map(|origin| HeaderValue::from_str(&origin).map_err(|_| ConfigError::InvalidOrigin(origin)))
            .transpose()?;

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let access_minutes: i64 = parse_number(&var, "JWT_ACCESS_TTL", 15)?;
        let refresh_hours: i64 = parse_number(&var, "JWT_REFRESH_TTL", 168)?;

        let config = Self {
            database_url,
            database_max_connections,
            bind_addr,
            cors_allowed_origin,
            auth: AuthConfig {
                jwt_secret,
                access_token_ttl: Duration::try_minutes(access_minutes).ok_or(
                    ConfigError::InvalidNumber {
                        name: "JWT_ACCESS_TTL",
                        value: access_minutes.to_string(),
                    },
                )?,
                refresh_token_ttl: Duration::try_hours(refresh_hours).ok_or(
                    ConfigError::InvalidNumber {
                        name: "JWT_REFRESH_TTL",
                        value: refresh_hours.to_string(),
                    },
                )?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.validate()
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }
        if self.access_token_ttl <= Duration::zero() {
            return Err(ConfigError::NonPositiveTtl("JWT_ACCESS_TTL"));
        }
        if self.refresh_token_ttl <= Duration::zero() {
            return Err(ConfigError::NonPositiveTtl("JWT_REFRESH_TTL"));
        }
        if self.access_token_ttl >= self.refresh_token_ttl {
            return Err(ConfigError::TtlOrder);
        }
        Ok(())
    }
}

fn parse_number<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}
