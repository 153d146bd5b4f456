//! # Jobdesk Cache
//!
//! Redis-based caching for the Jobdesk API.
//!
//! This crate provides:
//! - Redis connection management with JSON-serialized values
//! - Cache operations (get, set with TTL, delete, scan-delete by pattern)
//! - Deterministic cache key construction for the job listing endpoint
//! - One-time auth token keys with explicit TTLs
//! - Cache configuration from environment variables
//!
//! The cache is an optimization, not a correctness dependency: callers
//! hold an `Option<RedisCache>` and read paths fall through to the
//! database when the cache is absent or unreachable.
//!
//! # Example
//!
//! ```ignore
//! use jobdesk_cache::{CacheConfig, RedisCache, keys};
//!
//! let config = CacheConfig::from_env();
//! let cache = RedisCache::new(&config.redis_url.unwrap(), config.default_ttl()).await?;
//!
//! let key = keys::job_list(&raw_query);
//! if let Some(hit) = cache.get::<PaginatedJobsResponse>(&key).await {
//!     return Ok(hit);
//! }
//! ```

pub mod config;
pub mod keys;
pub mod redis;

pub use config::CacheConfig;
pub use keys::invalidate;
pub use redis::{CacheError, RedisCache};
