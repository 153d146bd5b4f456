use std::sync::Arc;

use sqlx::PgPool;
use tracing::warn;

use jobdesk_cache::{CacheConfig, RedisCache};
use jobdesk_core::{FileStorage, LocalFileStorage};

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::config::rate_limit::RateLimitConfig;
use crate::config::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Listing cache and one-time token store. `None` when Redis is not
    /// configured or unreachable at startup; read paths then hit the
    /// database directly.
    pub cache: Option<RedisCache>,
    pub files: Arc<dyn FileStorage>,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cache", &self.cache)
            .field("jwt_config", &self.jwt_config)
            .field("email_config", &self.email_config)
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state() -> AppState {
    let cache_config = CacheConfig::from_env();
    let cache = init_cache(&cache_config).await;
    let storage_config = StorageConfig::from_env();

    AppState {
        db: init_db_pool().await,
        cache,
        files: Arc::new(LocalFileStorage::new(
            storage_config.media_dir,
            storage_config.media_base_url,
        )),
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
    }
}

/// Connects to Redis when configured. A missing or unreachable cache is
/// logged and tolerated; listings fall back to direct database queries.
async fn init_cache(config: &CacheConfig) -> Option<RedisCache> {
    let url = config.redis_url.as_deref()?;

    match RedisCache::new(url, config.default_ttl()).await {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!(error = %e, "Redis unavailable, running without listing cache");
            None
        }
    }
}

/// Test helper: build an [`AppState`] around an existing pool with no
/// cache and a temp-dir file store.
pub fn test_state(db: PgPool) -> AppState {
    AppState {
        db,
        cache: None,
        files: Arc::new(LocalFileStorage::new(
            std::env::temp_dir().join("jobdesk-test-media"),
            "http://localhost:4000/media".to_string(),
        )),
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig {
            enabled: false,
            ..EmailConfig::from_env()
        },
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::default(),
    }
}
