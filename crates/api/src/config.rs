//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use crate::auth::AdminCredentials;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Admin login and token secret.
    pub admin: AdminCredentials,
    /// Accept cross-origin requests from any origin.
    pub cors_any: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BIZTOOLS_ADDR` | Server bind address | `127.0.0.1:8000` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:biztools.db?mode=rwc` |
    /// | `ADMIN_USERNAME` | Admin login name | `admin` |
    /// | `ADMIN_PASSWORD` | Admin password | `admin123` |
    /// | `ADMIN_TOKEN_SECRET` | Suffix mixed into the admin token | `biztools_admin_secret` |
    /// | `CORS_ANY` | Allow every origin, not just localhost | (unset) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("BIZTOOLS_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:biztools.db?mode=rwc".to_string());

        let admin = AdminCredentials::new(
            env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            env::var("ADMIN_TOKEN_SECRET")
                .unwrap_or_else(|_| AdminCredentials::DEFAULT_SECRET.to_string()),
        );

        if admin.is_default_password() {
            tracing::warn!("ADMIN_PASSWORD is not set, using the default password");
        }

        let cors_any = env::var("CORS_ANY")
            .map(|value| is_truthy(&value))
            .unwrap_or(false);

        Ok(Self {
            addr,
            database_url,
            admin,
            cors_any,
        })
    }
}

/// Interpret an environment flag. Empty, `0` and `false` are off.
fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid BIZTOOLS_ADDR format")]
    InvalidAddr,
}
