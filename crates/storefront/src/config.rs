//! Storefront configuration loaded from environment variables.
//!
//! Every variable is optional: a storefront without remote credentials still
//! serves the bundled menu and hands out mock orders.
//!
//! # Environment Variables
//!
//! - `CAFE_HOST` - Bind address (default: 127.0.0.1)
//! - `CAFE_PORT` - Listen port (default: 3000)
//! - `SUPABASE_URL` - Remote store endpoint (e.g., `https://abcd.supabase.co`)
//! - `SUPABASE_ANON_KEY` - Remote store access key
//! - `CAFE_REMOTE_TIMEOUT_SECS` - Remote request timeout (default: 10)
//! - `CAFE_MENU_CACHE_PATH` - Menu snapshot file; in-memory cache when unset
//! - `CAFE_BUNDLED_MENU` - Serve the sample menu as last resort (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

/// Fragments that only show up in template values copied from setup docs
/// (case-insensitive).
const URL_PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-project",
    "your-",
    "placeholder",
    "changeme",
    "replace-me",
    "<",
];

/// Host labels that stand in for a project ref. Matched against whole
/// labels so real hosts that merely contain them still count.
const HOST_PLACEHOLDER_LABELS: &[&str] = &["todo", "project-ref", "project-id"];

/// Key placeholders. Kept narrower than the URL list because real keys are
/// long random tokens.
const KEY_PLACEHOLDER_PATTERNS: &[&str] = &["your-", "placeholder", "changeme", "replace-me", "<"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct CafeConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Remote store connection settings
    pub remote: RemoteConfig,
    /// Where to persist the last good menu; `None` keeps it in memory
    pub menu_cache_path: Option<PathBuf>,
    /// Whether the bundled sample menu is served when nothing else is available
    pub bundled_menu: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Remote store connection settings.
///
/// Implements `Debug` manually to redact the access key.
#[derive(Clone, Default)]
pub struct RemoteConfig {
    /// Endpoint base URL
    pub url: Option<String>,
    /// Access key sent as `apikey` and bearer token
    pub anon_key: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field(
                "anon_key",
                &self.anon_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CafeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_or_default(&lookup, "CAFE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CAFE_HOST".to_string(), e.to_string()))?;
        let port = get_or_default(&lookup, "CAFE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CAFE_PORT".to_string(), e.to_string()))?;
        let bundled_menu = match get_optional(&lookup, "CAFE_BUNDLED_MENU") {
            Some(raw) => parse_bool("CAFE_BUNDLED_MENU", &raw)?,
            None => true,
        };

        Ok(Self {
            host,
            port,
            remote: RemoteConfig::from_lookup(&lookup)?,
            menu_cache_path: get_optional(&lookup, "CAFE_MENU_CACHE_PATH").map(PathBuf::from),
            bundled_menu,
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl RemoteConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout_secs = match get_optional(lookup, "CAFE_REMOTE_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("CAFE_REMOTE_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_REMOTE_TIMEOUT_SECS,
        };

        Ok(Self {
            url: get_optional(lookup, "SUPABASE_URL"),
            anon_key: get_optional(lookup, "SUPABASE_ANON_KEY").map(SecretString::from),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Whether the endpoint and key are both present and look like real
    /// credentials rather than template placeholders.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let (Some(url), Some(key)) = (self.url.as_deref(), self.anon_key.as_ref()) else {
            return false;
        };
        is_real_endpoint(url) && is_real_key(key.expose_secret())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn contains_placeholder(value: &str, patterns: &[&str]) -> bool {
    let lower = value.to_lowercase();
    patterns.iter().any(|pattern| lower.contains(pattern))
}

/// An absolute http(s) URL with a host and no placeholder fragments.
fn is_real_endpoint(raw: &str) -> bool {
    if contains_placeholder(raw, URL_PLACEHOLDER_PATTERNS) {
        return false;
    }
    Url::parse(raw).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https")
            && url
                .host_str()
                .is_some_and(|host| !host.is_empty() && !host.split('.').any(is_placeholder_label))
    })
}

/// `todo`, `project-ref` and runs of `x` such as `xxxx`.
fn is_placeholder_label(label: &str) -> bool {
    let label = label.to_lowercase();
    HOST_PLACEHOLDER_LABELS.contains(&label.as_str())
        || (label.len() >= 3 && label.chars().all(|c| c == 'x'))
}

fn is_real_key(raw: &str) -> bool {
    !raw.trim().is_empty() && !contains_placeholder(raw, KEY_PLACEHOLDER_PATTERNS)
}
