use super::{CacheEntry, CacheMetrics, CacheStats};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::net::IpAddr;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info};

/// Hostname-keyed cache of resolved address sets.
///
/// Backed by a sharded `DashMap`, so lookups for different hostnames do not
/// contend and concurrent writes to one hostname are last-writer-wins.
/// Expired entries are removed by the lookup that finds them; `compact()`
/// lets a background task remove the rest.
pub struct ResolverCache {
    entries: DashMap<Arc<str>, CacheEntry, FxBuildHasher>,
    metrics: Arc<CacheMetrics>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        info!(capacity = capacity, "Initializing resolver cache");

        Self {
            entries: DashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live address set for `hostname`, evicting it if it has expired.
    pub fn get(&self, hostname: &str) -> Option<Arc<[IpAddr]>> {
        self.get_entry(hostname).map(|entry| entry.addresses)
    }

    /// Live entry for `hostname`, evicting it if it has expired.
    pub fn get_entry(&self, hostname: &str) -> Option<CacheEntry> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(hostname) {
            if !entry.is_expired_at(now) {
                self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
                return Some(entry.value().clone());
            }

            drop(entry);
            // A concurrent writer may have refreshed the key in the meantime.
            if self
                .entries
                .remove_if(hostname, |_, entry| entry.is_expired_at(now))
                .is_some()
            {
                self.metrics
                    .expirations
                    .fetch_add(1, AtomicOrdering::Relaxed);
                debug!(hostname = %hostname, "Expired cache entry evicted");
            }
        }

        self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
        None
    }

    /// Store the full address set of one answer.
    ///
    /// Empty sets and zero TTLs are not cached; returns whether the entry was stored.
    pub fn insert(&self, hostname: &str, addresses: Arc<[IpAddr]>, ttl: u32) -> bool {
        if addresses.is_empty() || ttl == 0 {
            return false;
        }

        let count = addresses.len();
        self.entries
            .insert(Arc::from(hostname), CacheEntry::new(addresses, ttl));
        self.metrics
            .insertions
            .fetch_add(1, AtomicOrdering::Relaxed);

        debug!(
            hostname = %hostname,
            addresses = count,
            ttl = ttl,
            cache_size = self.entries.len(),
            "Inserted into cache"
        );

        true
    }

    /// Whether a live entry exists, without touching hit/miss counters.
    pub fn contains(&self, hostname: &str) -> bool {
        self.entries
            .get(hostname)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn compact(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            self.metrics
                .expirations
                .fetch_add(removed as u64, AtomicOrdering::Relaxed);
        }
        self.metrics
            .compactions
            .fetch_add(1, AtomicOrdering::Relaxed);

        removed
    }

    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.entries.len())
    }
}

impl Default for ResolverCache {
    fn default() -> Self {
        Self::new()
    }
}
