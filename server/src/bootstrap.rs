use std::sync::Arc;

use stream_cache::{MemoryStore, RecordStore, RedisStore};

use crate::config::defaults::loggable;
use crate::config::{AppConfig, CacheBackend};

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load .env and the runtime config (fatal on error).
pub fn init_foundation() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();
    let config = AppConfig::from_env()?;
    tracing::info!(
        port = config.server_port,
        backend = ?config.cache_backend,
        default_streamers = config.default_streamers.len(),
        "Settings loaded"
    );
    Ok(config)
}

/// Connect to the configured cache backend and confirm it answers.
pub async fn connect_store(config: &AppConfig) -> Result<Arc<dyn RecordStore>, anyhow::Error> {
    let store: Arc<dyn RecordStore> = match config.cache_backend {
        CacheBackend::Redis => {
            tracing::info!(
                redis_url = loggable("REDIS_URL", &config.redis_url),
                "Connecting to Redis cache"
            );
            Arc::new(RedisStore::connect(&config.redis_url).await?)
        }
        CacheBackend::Memory => {
            tracing::warn!("Using in-process cache; entries are not shared between instances");
            Arc::new(MemoryStore::new())
        }
    };
    store.ping().await?;
    Ok(store)
}
