//! Cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Redis cache configuration.
///
/// # Environment Variables
///
/// - `REDIS_URL`: Redis connection URL. When unset, caching is disabled
///   and all reads go straight to the database.
/// - `CACHE_TTL_SECONDS`: TTL for cached listing pages (default: `60`)
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Redis connection URL; `None` disables caching entirely.
    pub redis_url: Option<String>,

    /// Time-to-live for cached listing pages in seconds.
    pub default_ttl_seconds: u64,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            default_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            default_ttl_seconds: 60,
        }
    }
}
