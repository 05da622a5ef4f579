//! Server settings read from the environment.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_SESSION_COOKIE: &str = "todo_session";
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBind {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("{name} must be a boolean, got {value:?}")]
    InvalidFlag { name: &'static str, value: String },

    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub log_json: bool,
    pub session_cookie: String,
    pub secure_cookie: bool,
    /// Sessions untouched for this long are dropped.
    pub session_idle: Duration,
    /// Upper bound on live sessions; the least recently seen is dropped
    /// to make room.
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_json: false,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            secure_cookie: false,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("TODOS_BIND").unwrap_or_else(|| {
            let port = lookup("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
            format!("127.0.0.1:{port}")
        });
        let bind: SocketAddr = bind
            .parse()
            .map_err(|source| ConfigError::InvalidBind { value: bind.clone(), source })?;

        let idle_secs = positive(&lookup, "TODOS_SESSION_IDLE_SECS")?
            .map_or(DEFAULT_SESSION_IDLE_SECS, |secs| secs as u64);

        Ok(Self {
            bind,
            log_json: flag(&lookup, "TODOS_LOG_JSON", false)?,
            session_cookie: lookup("TODOS_SESSION_COOKIE")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
            secure_cookie: flag(&lookup, "TODOS_SECURE_COOKIE", false)?,
            session_idle: Duration::from_secs(idle_secs),
            max_sessions: positive(&lookup, "TODOS_MAX_SESSIONS")?.unwrap_or(DEFAULT_MAX_SESSIONS),
        })
    }
}

fn flag<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    let trimmed = value.trim();
    if ["1", "true", "yes", "on"].iter().any(|v| trimmed.eq_ignore_ascii_case(v)) {
        Ok(true)
    } else if ["0", "false", "no", "off"].iter().any(|v| trimmed.eq_ignore_ascii_case(v)) {
        Ok(false)
    } else {
        Err(ConfigError::InvalidFlag { name, value })
    }
}

fn positive<F>(lookup: &F, name: &'static str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(ConfigError::InvalidNumber { name, value }),
        },
    }
}
