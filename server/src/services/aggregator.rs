//! Concurrent fan-out of many streamer lookups into one batch.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tokio::task::JoinSet;

use stream_cache::{CacheError, RecordStore, StreamerRecord};

use super::resolver::{Resolution, StreamerResolver};

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("cache unavailable: {0}")]
    CacheUnavailable(#[source] CacheError),
}

pub struct Aggregator {
    resolver: Arc<StreamerResolver>,
    store: Arc<dyn RecordStore>,
}

impl Aggregator {
    pub fn new(resolver: Arc<StreamerResolver>, store: Arc<dyn RecordStore>) -> Self {
        Self { resolver, store }
    }

    /// Resolve every name concurrently and collect the live ones.
    ///
    /// Output order is completion order, not input order. A failing name is
    /// logged and left out without affecting the others.
    pub async fn aggregate(
        &self,
        names: Vec<String>,
    ) -> Result<Vec<StreamerRecord>, AggregateError> {
        self.store
            .ping()
            .await
            .map_err(AggregateError::CacheUnavailable)?;

        let started = Instant::now();
        let requested = names.len();
        let results = Arc::new(Mutex::new(Vec::with_capacity(requested)));
        let mut tasks = JoinSet::new();

        for name in names {
            let name = name.trim().to_string();
            if name.is_empty() {
                continue;
            }
            let resolver = self.resolver.clone();
            let results = results.clone();
            tasks.spawn(async move {
                match resolver.resolve(&name).await {
                    Ok(Resolution::Found(record)) => results.lock().await.push(record),
                    Ok(Resolution::NoProfile | Resolution::NotLive) => {}
                    Err(e) => tracing::warn!(streamer = %name, error = %e, "Lookup failed"),
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Lookup task panicked");
            }
        }

        let records = std::mem::take(&mut *results.lock().await);
        tracing::info!(
            requested,
            live = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregated streamers"
        );
        Ok(records)
    }
}
