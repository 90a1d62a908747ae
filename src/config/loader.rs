//! Load config from the process environment (or any key lookup, for tests).

use crate::auth::AdminCredential;
use crate::config::types::*;
use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/students";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "password";

impl AppConfig {
    /// Read settings from environment variables. Call `dotenvy::dotenv()` first to honor `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            max_connections: parsed(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
        };
        let http = HttpConfig {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            body_limit: parsed(&lookup, "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT)?,
        };

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let ttl_minutes: i64 = parsed(&lookup, "TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;
        if ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_MINUTES",
                message: "must be greater than zero".into(),
            });
        }
        let username = non_empty(&lookup, "ADMIN_USERNAME", DEFAULT_ADMIN_USERNAME)?;
        let password = non_empty(&lookup, "ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD)?;

        Ok(AppConfig {
            database,
            http,
            auth: AuthConfig {
                jwt_secret,
                token_ttl: chrono::Duration::minutes(ttl_minutes),
                admin: AdminCredential::new(username, password),
            },
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
    }
}

fn non_empty<F>(lookup: &F, key: &'static str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    if value.is_empty() {
        return Err(ConfigError::Invalid {
            key,
            message: "must not be empty".into(),
        });
    }
    Ok(value)
}
