use super::cache::ResolverCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Background compaction of expired resolver cache entries.
///
/// Lookups already evict what they find expired; the sweeper bounds memory
/// held by hostnames that are never asked for again.
pub struct CacheSweeper {
    cache: Arc<ResolverCache>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl CacheSweeper {
    pub fn new(cache: Arc<ResolverCache>, interval: Duration) -> Self {
        Self {
            cache,
            interval,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                interval_secs = self.interval.as_secs(),
                "Cache sweeper started"
            );

            let mut interval = tokio::time::interval_at(
                tokio::time::Instant::now() + self.interval,
                self.interval,
            );
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("CacheSweeper: shutting down");
                        break;
                    }
                    _ = interval.tick() => self.sweep(),
                }
            }
        })
    }

    fn sweep(&self) {
        let removed = self.cache.compact();

        if removed > 0 {
            info!(
                removed = removed,
                cache_size = self.cache.len(),
                "Background compaction completed"
            );
        } else {
            debug!("No entries to compact");
        }
    }
}
