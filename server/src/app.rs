use std::sync::Arc;

use stream_cache::RecordStore;

use crate::config::AppConfig;
use crate::services::aggregator::Aggregator;
use crate::services::resolver::StreamerResolver;
use crate::services::upstream::StreamerUpstream;

/// Application shared state accessible from axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    config: AppConfig,
    store: Arc<dyn RecordStore>,
    resolver: Arc<StreamerResolver>,
    aggregator: Aggregator,
}

impl SharedState {
    /// Wire the resolver and aggregator over an already-connected store.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn RecordStore>,
        upstream: Arc<dyn StreamerUpstream>,
    ) -> Self {
        let resolver = Arc::new(StreamerResolver::new(
            store.clone(),
            upstream,
            config.token_ttl,
            config.record_ttl,
        ));
        let aggregator = Aggregator::new(resolver.clone(), store.clone());

        Self {
            inner: Arc::new(SharedStateInner {
                config,
                store,
                resolver,
                aggregator,
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.inner.store
    }

    pub fn resolver(&self) -> &StreamerResolver {
        &self.inner.resolver
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.inner.aggregator
    }
}
