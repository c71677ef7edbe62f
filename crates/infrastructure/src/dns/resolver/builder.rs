use super::super::cache::ResolverCache;
use super::super::selection::{AddressSelector, FastrandSelector};
use super::system::SystemResolver;
use super::upstream::{UpstreamClient, UpstreamResolver};
use socksgate_application::ports::NameResolver;
use socksgate_domain::{ConfigError, ResolverConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct ResolverBuilder {
    upstream: Option<SocketAddr>,
    prefer_ipv6: bool,
    query_timeout: Duration,
    cache: Option<Arc<ResolverCache>>,
    selector: Arc<dyn AddressSelector>,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            upstream: None,
            prefer_ipv6: false,
            query_timeout: ResolverConfig::default().query_timeout(),
            cache: None,
            selector: Arc::new(FastrandSelector),
        }
    }

    /// Upstream, family preference and timeout taken from `config`.
    ///
    /// The cache is not created here; pass one with [`Self::with_cache`].
    pub fn from_config(config: &ResolverConfig) -> Result<Self, ConfigError> {
        let mut builder = Self::new()
            .prefer_ipv6(config.prefer_ipv6)
            .with_query_timeout(config.query_timeout());

        if let Some(addr) = config.upstream_addr()? {
            builder = builder.with_upstream(addr);
        }

        Ok(builder)
    }

    pub fn with_upstream(mut self, server: SocketAddr) -> Self {
        self.upstream = Some(server);
        self
    }

    pub fn prefer_ipv6(mut self, prefer: bool) -> Self {
        self.prefer_ipv6 = prefer;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_cache(mut self, cache: Arc<ResolverCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_selector(mut self, selector: Arc<dyn AddressSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn build(self) -> Arc<dyn NameResolver> {
        match self.upstream {
            None => {
                if self.cache.is_some() {
                    warn!("Cache is only used with an upstream server; system resolver runs uncached");
                }
                info!(prefer_ipv6 = self.prefer_ipv6, "Using system resolver");
                Arc::new(SystemResolver::new(self.prefer_ipv6, self.query_timeout))
            }
            Some(server) => {
                info!(
                    server = %server,
                    prefer_ipv6 = self.prefer_ipv6,
                    cache = self.cache.is_some(),
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "Using upstream resolver"
                );
                Arc::new(UpstreamResolver::new(
                    UpstreamClient::new(server, self.query_timeout),
                    self.cache,
                    self.selector,
                    self.prefer_ipv6,
                ))
            }
        }
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
