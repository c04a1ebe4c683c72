//! Process configuration, read once from the environment at startup.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `DB_HOST` | yes | (`host` or `host:port`) |
//! | `DB_NAME` | yes | |
//! | `DB_USER` | yes | |
//! | `DB_PASSWORD` | yes | |
//! | `DB_CONNECT_TIMEOUT_SECS` | no | `5` |
//! | `JWT_SECRET` | no | empty (every issuance then fails with 500) |
//! | `LISTEN_ADDR` | no | `0.0.0.0:8080` |

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: Option<u16>,
    pub name: String,
    pub user: String,
    pub password: String,
    pub connect_timeout: Duration,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let (host, port) = split_host_port(&require("DB_HOST")?)?;

        let connect_timeout = match get("DB_CONNECT_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: "DB_CONNECT_TIMEOUT_SECS",
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let database = DatabaseConfig {
            host,
            port,
            name: require("DB_NAME")?,
            user: require("DB_USER")?,
            password: require("DB_PASSWORD")?,
            connect_timeout,
        };

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; token issuance will fail until it is configured");
            String::new()
        });

        let listen_addr = get("LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "LISTEN_ADDR",
                reason: e.to_string(),
            })?;

        Ok(Self {
            database,
            auth: AuthConfig { jwt_secret },
            server: ServerConfig { listen_addr },
        })
    }
}

impl DatabaseConfig {
    /// Credential-free connection string, `postgres://<host>/<db>`.
    pub fn connection_url(&self) -> String {
        match self.port {
            Some(port) => format!("postgres://{}:{}/{}", self.host, port, self.name),
            None => format!("postgres://{}/{}", self.host, self.name),
        }
    }
}

impl core::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.connection_url())
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &if self.jwt_secret.is_empty() { "<empty>" } else { "<redacted>" })
            .finish()
    }
}

/// Accepts `host` or `host:port`. Bracketed IPv6 literals keep their brackets.
fn split_host_port(raw: &str) -> Result<(String, Option<u16>), ConfigError> {
    let raw = raw.trim();
    let Some((host, port)) = raw.rsplit_once(':') else {
        return Ok((raw.to_string(), None));
    };

    // Bare IPv6 literal without a port.
    if host.contains(':') && !host.ends_with(']') {
        return Ok((raw.to_string(), None));
    }

    let port = port.parse::<u16>().map_err(|e| ConfigError::Invalid {
        var: "DB_HOST",
        reason: format!("bad port {port:?}: {e}"),
    })?;
    Ok((host.to_string(), Some(port)))
}
