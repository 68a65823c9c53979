//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CART_API_BASE_URL` - Inventory API base URL (default: `http://localhost:3333`)
//! - `CART_API_TOKEN` - Bearer token sent to the inventory API
//! - `CART_API_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `CART_CATALOG_CACHE_TTL_SECS` - Catalog cache TTL in seconds (default: 300)
//! - `CART_CATALOG_CACHE_CAPACITY` - Catalog cache entry limit (default: 1000)
//! - `CART_STORAGE_PATH` - Key-value file location (default: `.rocketshoes/storage.json`)
//! - `CART_STORAGE_KEY` - Key holding the cart snapshot (default: `@RocketShoes:cart`)
//! - `CART_CURRENCY` - Display currency (default: BRL)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rocketshoes_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Storage key used by the storefront for the cart snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_PATH: &str = ".rocketshoes/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Inventory API configuration
    pub api: ApiConfig,
    /// Snapshot persistence configuration
    pub storage: StorageConfig,
    /// Currency used to render prices
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Inventory API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; always ends with `/` so endpoint paths join beneath it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long catalog responses stay cached
    pub catalog_cache_ttl: Duration,
    /// Maximum number of cached catalog responses
    pub catalog_cache_capacity: u64,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("catalog_cache_ttl", &self.catalog_cache_ttl)
            .field("catalog_cache_capacity", &self.catalog_cache_capacity)
            .finish()
    }
}

/// Where and under which key the cart snapshot is stored.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub key: String,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api: ApiConfig::from_lookup(&lookup)?,
            storage: StorageConfig::from_lookup(&lookup),
            currency: parse_or_default(&lookup, "CART_CURRENCY", CurrencyCode::default())?,
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
        })
    }
}

impl ApiConfig {
    /// Configuration pointing at `base_url` with default timeouts and cache.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("CART_API_BASE_URL", base_url)?,
            token: None,
            timeout: Duration::from_secs(10),
            catalog_cache_ttl: Duration::from_secs(300),
            catalog_cache_capacity: 1000,
        })
    }

    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = get_env_or_default(lookup, "CART_API_BASE_URL", DEFAULT_API_BASE_URL);
        Ok(Self {
            base_url: parse_base_url("CART_API_BASE_URL", &base_url)?,
            token: get_optional_env(lookup, "CART_API_TOKEN").map(SecretString::from),
            timeout: Duration::from_secs(parse_or_default(lookup, "CART_API_TIMEOUT_SECS", 10)?),
            catalog_cache_ttl: Duration::from_secs(parse_or_default(
                lookup,
                "CART_CATALOG_CACHE_TTL_SECS",
                300,
            )?),
            catalog_cache_capacity: parse_or_default(lookup, "CART_CATALOG_CACHE_CAPACITY", 1000)?,
        })
    }
}

impl StorageConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            path: PathBuf::from(get_env_or_default(
                lookup,
                "CART_STORAGE_PATH",
                DEFAULT_STORAGE_PATH,
            )),
            key: get_env_or_default(lookup, "CART_STORAGE_KEY", DEFAULT_STORAGE_KEY),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating empty values as unset.
fn get_optional_env<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(lookup, key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a base URL and make sure relative joins land beneath its path.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
