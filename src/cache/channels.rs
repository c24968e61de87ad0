use crate::cache::store::{ChannelStore, StoreError};
use crate::error::{NotifyError, Result};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How long a name ↔ ID mapping is kept
pub const CHANNEL_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Cache statistics for the run summary
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub unavailable: u64,
}

/// Bidirectional channel name ↔ ID cache over a [`ChannelStore`]
pub struct ChannelCache<S> {
    /// Backing key-value store
    store: S,

    /// Prefix shared by every key this cache writes
    namespace: String,

    /// Expiry applied to every write
    ttl: Duration,

    /// Set once the store has reported itself unavailable
    degraded: AtomicBool,

    stats: Mutex<CacheStats>,
}

impl<S: ChannelStore> ChannelCache<S> {
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self::with_ttl(store, namespace, CHANNEL_TTL)
    }

    pub fn with_ttl(store: S, namespace: impl Into<String>, ttl: Duration) -> Self {
        let namespace = namespace.into();
        tracing::debug!(
            namespace = %namespace,
            ttl_secs = ttl.as_secs(),
            "Creating channel cache"
        );

        Self {
            store,
            namespace,
            ttl,
            degraded: AtomicBool::new(false),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Look up a channel ID by name, or a channel name by ID.
    ///
    /// An unavailable store is logged and reported as a miss.
    pub async fn get(&self, name_or_id: &str) -> Result<Option<String>> {
        if self.is_degraded() {
            self.record(|s| s.misses += 1);
            return Ok(None);
        }

        match self.store.get(&self.key(name_or_id)).await {
            Ok(Some(value)) => {
                self.record(|s| s.hits += 1);
                tracing::debug!(key = %name_or_id, value = %value, "Channel cache hit");
                Ok(Some(value))
            }
            Ok(None) => {
                self.record(|s| s.misses += 1);
                tracing::debug!(key = %name_or_id, "Channel cache miss");
                Ok(None)
            }
            Err(StoreError::Unavailable(reason)) => {
                self.mark_unavailable(&reason);
                self.record(|s| s.misses += 1);
                Ok(None)
            }
            Err(StoreError::Unexpected(reason)) => Err(NotifyError::Cache(reason)),
        }
    }

    /// Remember a channel in both directions.
    ///
    /// Best-effort: an unavailable store is logged and ignored.
    pub async fn put(&self, name: &str, id: &str) -> Result<()> {
        if self.is_degraded() {
            return Ok(());
        }

        let name_key = self.key(name);
        let id_key = self.key(id);

        match self
            .store
            .put_pair((name_key.as_str(), id), (id_key.as_str(), name), self.ttl)
            .await
        {
            Ok(()) => {
                self.record(|s| s.writes += 1);
                tracing::trace!(channel = %name, channel_id = %id, "Cached channel");
                Ok(())
            }
            Err(StoreError::Unavailable(reason)) => {
                self.mark_unavailable(&reason);
                Ok(())
            }
            Err(StoreError::Unexpected(reason)) => Err(NotifyError::Cache(reason)),
        }
    }

    /// Backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Log cache statistics for the run
    pub fn log_stats(&self) {
        let stats = self.stats();
        let lookups = stats.hits + stats.misses;
        let hit_rate = if lookups > 0 {
            (stats.hits as f32 / lookups as f32 * 100.0) as u32
        } else {
            0
        };

        tracing::info!(
            hits = stats.hits,
            misses = stats.misses,
            hit_rate = hit_rate,
            writes = stats.writes,
            unavailable = stats.unavailable,
            degraded = self.is_degraded(),
            "Channel cache statistics"
        );
    }

    fn key(&self, name_or_id: &str) -> String {
        format!("{}:{}", self.namespace, name_or_id)
    }

    fn mark_unavailable(&self, reason: &str) {
        self.record(|s| s.unavailable += 1);
        // Warn once; later calls skip the store entirely
        if !self.degraded.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                error = %reason,
                "Channel cache unavailable, falling back to directory scan"
            );
        }
    }

    fn record(&self, update: impl FnOnce(&mut CacheStats)) {
        if let Ok(mut stats) = self.stats.lock() {
            update(&mut stats);
        }
    }
}
