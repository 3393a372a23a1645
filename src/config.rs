//! Console configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Unset or unparsable values fall back
//! to the defaults documented on each field.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::query::DEFAULT_PAGE_SIZE;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Top-level console configuration.
///
/// Loaded once at startup via [`ConsoleConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Socket address to bind the HTTP server to (`LISTEN_ADDR`, default
    /// `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Base URL of the moderation API, without trailing slash
    /// (`MODERATION_API_URL`, default `http://localhost:3001/api/v1`).
    pub moderation_api_url: String,

    /// Per-request timeout for moderation API calls
    /// (`UPSTREAM_TIMEOUT_SECS`, default 10).
    pub upstream_timeout: Duration,

    /// Listings requested per upstream page while refreshing
    /// (`UPSTREAM_PAGE_LIMIT`, default 100).
    pub upstream_page_limit: u32,

    /// Listings per console page (`PAGE_SIZE`, default 10).
    pub page_size: usize,

    /// Directory holding the persisted working copy and preferences
    /// (`STATE_DIR`, default `.moderation-console`).
    pub state_dir: PathBuf,

    /// Master switch for local persistence (`PERSISTENCE_ENABLED`, default
    /// true).
    pub persistence_enabled: bool,

    /// Timeout applied to every console HTTP request
    /// (`REQUEST_TIMEOUT_SECS`, default 30).
    pub request_timeout: Duration,

    /// Log output format (`LOG_FORMAT`, `text` or `json`).
    pub log_format: LogFormat,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            moderation_api_url: "http://localhost:3001/api/v1".to_string(),
            upstream_timeout: Duration::from_secs(10),
            upstream_page_limit: 100,
            page_size: DEFAULT_PAGE_SIZE,
            state_dir: PathBuf::from(".moderation-console"),
            persistence_enabled: true,
            request_timeout: Duration::from_secs(30),
            log_format: LogFormat::Text,
        }
    }
}

impl ConsoleConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to [`ConsoleConfig::default`] values when a variable is
    /// not set. Calls `dotenvy::dotenv().ok()` to optionally load a `.env`
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.listen_addr,
        };

        let moderation_api_url = std::env::var("MODERATION_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.moderation_api_url);

        let upstream_timeout = Duration::from_secs(parse_env("UPSTREAM_TIMEOUT_SECS", 10));
        let upstream_page_limit = parse_env("UPSTREAM_PAGE_LIMIT", defaults.upstream_page_limit).max(1);
        let page_size = parse_env("PAGE_SIZE", defaults.page_size).max(1);

        let state_dir = std::env::var("STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.state_dir);
        let persistence_enabled = parse_env_bool("PERSISTENCE_ENABLED", true);

        let request_timeout = Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 30));

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            moderation_api_url,
            upstream_timeout,
            upstream_page_limit,
            page_size,
            state_dir,
            persistence_enabled,
            request_timeout,
            log_format,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses a boolean switch: `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`,
/// in any casing.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parses an environment variable with [`parse_bool`]. Returns `default`
/// on missing or invalid values.
fn parse_env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}
