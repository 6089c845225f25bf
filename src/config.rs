use std::{env, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::rate_limit::RateLimitConfig;

/// Signing secret used when `JWT_SECRET` is absent outside production.
pub const FALLBACK_JWT_SECRET: &str = "fallback-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set when APP_ENV=production")]
    MissingSecret,
    #[error("invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub environment: Environment,
    pub allowed_origins: Vec<String>,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Reads the process environment. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup so tests never touch the
    /// real process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Development);

        let port = parse_or(&lookup, "PORT", 3001)?;

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None if environment.is_production() => return Err(ConfigError::MissingSecret),
            None => {
                warn!("JWT_SECRET not set, using the built-in development secret");
                FALLBACK_JWT_SECRET.to_string()
            }
        };

        let allowed_origins = parse_origins(
            &lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".into()),
        );

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            info!("DATABASE_URL not set, using local garage.db");
            "sqlite://garage.db?mode=rwc".into()
        });

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            max_requests: parse_or(&lookup, "RATE_LIMIT_MAX", defaults.max_requests)?,
            window: parse_or(&lookup, "RATE_LIMIT_WINDOW_SECS", defaults.window.as_secs())
                .map(Duration::from_secs)?,
        };
        if rate_limit.max_requests == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_MAX",
                reason: "must be positive".into(),
            });
        }
        if rate_limit.window.is_zero() {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_WINDOW_SECS",
                reason: "must be positive".into(),
            });
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database_url,
            jwt_secret,
            environment,
            allowed_origins,
            rate_limit,
        })
    }

    /// Whether the session cookie carries the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.environment.is_production()
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}
