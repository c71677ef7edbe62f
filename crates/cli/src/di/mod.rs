use socksgate_application::ports::NameResolver;
use socksgate_application::use_cases::AdmitConnectionUseCase;
use socksgate_domain::{Config, RuleEngine};
use socksgate_infrastructure::dns::{CacheSweeper, ResolverBuilder, ResolverCache};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Everything a request handler needs, built once from validated config.
pub struct Services {
    pub resolver: Arc<dyn NameResolver>,
    pub admit: Arc<AdmitConnectionUseCase>,
    pub cache: Option<Arc<ResolverCache>>,
}

impl Services {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let rules = Arc::new(RuleEngine::new(config.admission_policy()?));

        let mut builder = ResolverBuilder::from_config(&config.resolver)?;

        // The system resolver caches on its own.
        let cache = (config.resolver.cache_enabled && config.resolver.upstream_addr()?.is_some())
            .then(|| Arc::new(ResolverCache::new()));
        if let Some(cache) = &cache {
            builder = builder.with_cache(Arc::clone(cache));
        }

        let resolver = builder.build();
        let admit = Arc::new(AdmitConnectionUseCase::new(Arc::clone(&resolver), rules));

        Ok(Self {
            resolver,
            admit,
            cache,
        })
    }

    /// Start the cache sweeper when there is a cache to sweep.
    pub fn start_background_tasks(
        &self,
        config: &Config,
        shutdown: CancellationToken,
    ) -> Option<JoinHandle<()>> {
        self.cache.as_ref().map(|cache| {
            CacheSweeper::new(Arc::clone(cache), config.resolver.cache_sweep_interval())
                .with_cancellation(shutdown)
                .start()
        })
    }

    pub fn log_cache_stats(&self) {
        if let Some(cache) = &self.cache {
            let stats = cache.stats();
            info!(
                entries = stats.entries,
                hits = stats.hits,
                misses = stats.misses,
                insertions = stats.insertions,
                expirations = stats.expirations,
                hit_rate = cache.metrics().hit_rate(),
                "Resolver cache statistics"
            );
        }
    }
}
