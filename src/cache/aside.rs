//! Best-effort JSON cache-aside helper.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::config::CacheConfig;
use super::keys::CacheKey;
use super::store::{KeyValueCache, NoopCache};

const SOURCE: &str = "cache::aside";

/// Typed front for a [`KeyValueCache`].
///
/// None of the methods return errors: a failing backend degrades to a miss
/// (reads) or a skipped write, and the caller falls back to the database.
#[derive(Clone)]
pub struct CacheAside {
    backend: Arc<dyn KeyValueCache>,
    ttl: Duration,
    namespace: String,
}

impl CacheAside {
    pub fn new(backend: Arc<dyn KeyValueCache>, config: &CacheConfig) -> Self {
        if !config.is_enabled() {
            return Self::disabled();
        }
        Self {
            backend,
            ttl: config.ttl,
            namespace: config.namespace.clone(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            backend: Arc::new(NoopCache),
            ttl: Duration::ZERO,
            namespace: String::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn read<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let rendered = key.render(&self.namespace);
        match self.backend.get(&rendered).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    counter!("caltrade_cache_hit_total", "kind" => key.kind()).increment(1);
                    Some(value)
                }
                Err(err) => {
                    counter!("caltrade_cache_error_total", "kind" => key.kind()).increment(1);
                    warn!(
                        target_module = SOURCE,
                        op = "read",
                        key = %rendered,
                        error = %err,
                        "Discarding undecodable cache entry"
                    );
                    self.invalidate(key).await;
                    None
                }
            },
            Ok(None) => {
                counter!("caltrade_cache_miss_total", "kind" => key.kind()).increment(1);
                None
            }
            Err(err) => {
                counter!("caltrade_cache_error_total", "kind" => key.kind()).increment(1);
                warn!(
                    target_module = SOURCE,
                    op = "read",
                    key = %rendered,
                    error = %err,
                    "Cache read failed; falling back to database"
                );
                None
            }
        }
    }

    pub async fn write<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) {
        if self.ttl.is_zero() {
            return;
        }

        let rendered = key.render(&self.namespace);
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                counter!("caltrade_cache_error_total", "kind" => key.kind()).increment(1);
                warn!(
                    target_module = SOURCE,
                    op = "write",
                    key = %rendered,
                    error = %err,
                    "Cache value could not be encoded"
                );
                return;
            }
        };

        if let Err(err) = self.backend.set(&rendered, encoded, self.ttl).await {
            counter!("caltrade_cache_error_total", "kind" => key.kind()).increment(1);
            warn!(
                target_module = SOURCE,
                op = "write",
                key = %rendered,
                error = %err,
                "Cache write failed"
            );
        } else {
            debug!(target_module = SOURCE, key = %rendered, "Cache entry written");
        }
    }

    pub async fn invalidate(&self, key: &CacheKey) {
        let rendered = key.render(&self.namespace);
        if let Err(err) = self.backend.delete(&rendered).await {
            counter!("caltrade_cache_error_total", "kind" => key.kind()).increment(1);
            warn!(
                target_module = SOURCE,
                op = "invalidate",
                key = %rendered,
                error = %err,
                "Cache invalidation failed"
            );
        }
    }
}
