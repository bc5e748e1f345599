//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::cache::{StrategyKind, DEFAULT_TTL, LARGE_COLLECTION_THRESHOLD};
use crate::error::{CacheError, Result};

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend endpoint, `memory://` or `redis://host:port`
    pub backend_url: String,
    /// Storage layout used for typed entries
    pub strategy: StrategyKind,
    /// TTL applied to string keys stored without an explicit TTL
    pub default_ttl: Duration,
    /// Bucket size above which `list_all` fetches members one by one
    pub large_collection_threshold: u64,
    /// Turn custom-key decode failures into the empty-default object
    pub lenient_custom_key_decode: bool,
    /// HTTP server port
    pub server_port: u16,
    /// Memory backend sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND_URL` - Backend endpoint (default: memory://)
    /// - `CACHE_STRATEGY` - `grouped-hash` or `keyed-string` (default: grouped-hash)
    /// - `CACHE_DEFAULT_TTL` - `days:hours:minutes:seconds` (default: 365:0:0:0)
    /// - `CACHE_LARGE_COLLECTION_THRESHOLD` - Bulk read cutoff (default: 65000)
    /// - `CACHE_LENIENT_CUSTOM_KEY_DECODE` - `true`/`false` (default: true)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let default_ttl = match env::var("CACHE_DEFAULT_TTL") {
            Ok(raw) => parse_ttl(&raw).unwrap_or_else(|err| {
                warn!("{}, falling back to 365:0:0:0", err);
                defaults.default_ttl
            }),
            Err(_) => defaults.default_ttl,
        };

        Self {
            backend_url: env::var("CACHE_BACKEND_URL").unwrap_or(defaults.backend_url),
            strategy: env_or("CACHE_STRATEGY", defaults.strategy),
            default_ttl,
            large_collection_threshold: env_or(
                "CACHE_LARGE_COLLECTION_THRESHOLD",
                defaults.large_collection_threshold,
            ),
            lenient_custom_key_decode: env_or(
                "CACHE_LENIENT_CUSTOM_KEY_DECODE",
                defaults.lenient_custom_key_decode,
            ),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }
}

/// Reads and parses `name`, logging and falling back to `default` when the
/// value is present but malformed.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!("Invalid {} '{}' ({}), falling back to {}", name, raw, err, default);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "memory://".to_string(),
            strategy: StrategyKind::GroupedHash,
            default_ttl: DEFAULT_TTL,
            large_collection_threshold: LARGE_COLLECTION_THRESHOLD,
            lenient_custom_key_decode: true,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}

// == TTL Parsing ==
/// Parses a TTL written as `days:hours:minutes:seconds`.
///
/// All four components are required and must be non-negative integers.
pub fn parse_ttl(raw: &str) -> Result<Duration> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    if parts.len() != 4 {
        return Err(CacheError::InvalidConfig(format!(
            "TTL '{}' must have the form days:hours:minutes:seconds",
            raw
        )));
    }

    let mut values = [0u64; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part.trim().parse().map_err(|_| {
            CacheError::InvalidConfig(format!("TTL component '{}' is not a number", part))
        })?;
    }

    let [days, hours, minutes, seconds] = values;
    days.checked_mul(86_400)
        .and_then(|total| total.checked_add(hours.checked_mul(3_600)?))
        .and_then(|total| total.checked_add(minutes.checked_mul(60)?))
        .and_then(|total| total.checked_add(seconds))
        .map(Duration::from_secs)
        .ok_or_else(|| CacheError::InvalidConfig(format!("TTL '{}' is out of range", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend_url, "memory://");
        assert_eq!(config.strategy, StrategyKind::GroupedHash);
        assert_eq!(config.default_ttl, Duration::from_secs(365 * 86_400));
        assert_eq!(config.large_collection_threshold, 65_000);
        assert!(config.lenient_custom_key_decode);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_BACKEND_URL");
        env::remove_var("CACHE_STRATEGY");
        env::remove_var("CACHE_DEFAULT_TTL");
        env::remove_var("CACHE_LARGE_COLLECTION_THRESHOLD");
        env::remove_var("CACHE_LENIENT_CUSTOM_KEY_DECODE");
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");

        let config = Config::from_env();
        assert_eq!(config.backend_url, "memory://");
        assert_eq!(config.strategy, StrategyKind::GroupedHash);
        assert_eq!(config.default_ttl, DEFAULT_TTL);
        assert_eq!(config.large_collection_threshold, 65_000);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl("0:0:0:30").unwrap(), Duration::from_secs(30));
        assert_eq!(
            parse_ttl("1:2:3:4").unwrap(),
            Duration::from_secs(86_400 + 2 * 3_600 + 3 * 60 + 4)
        );
        assert_eq!(parse_ttl("365:0:0:0").unwrap(), DEFAULT_TTL);
    }

    #[test]
    fn test_parse_ttl_rejects_malformed() {
        assert!(matches!(parse_ttl("30"), Err(CacheError::InvalidConfig(_))));
        assert!(matches!(
            parse_ttl("1:2:3"),
            Err(CacheError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_ttl("1:x:0:0"),
            Err(CacheError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_ttl("-1:0:0:0"),
            Err(CacheError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_ttl("300000000000000:0:0:0"),
            Err(CacheError::InvalidConfig(_))
        ));
        assert!(parse_ttl("0:0:0:18446744073709551615").is_ok());
        assert!(matches!(
            parse_ttl("0:0:1:18446744073709551615"),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_env_or_falls_back_on_malformed_value() {
        env::set_var("TYPED_CACHE_TEST_BAD_THRESHOLD", "lots");
        env::set_var("TYPED_CACHE_TEST_BAD_FLAG", "maybe");
        env::set_var("TYPED_CACHE_TEST_GOOD_THRESHOLD", " 10 ");

        assert_eq!(env_or("TYPED_CACHE_TEST_BAD_THRESHOLD", 65_000u64), 65_000);
        assert!(env_or("TYPED_CACHE_TEST_BAD_FLAG", true));
        assert_eq!(env_or("TYPED_CACHE_TEST_GOOD_THRESHOLD", 65_000u64), 10);
        assert_eq!(
            env_or("TYPED_CACHE_TEST_UNSET", StrategyKind::KeyedString),
            StrategyKind::KeyedString
        );
    }
}
