#![allow(dead_code)]
use super::dns_server_mock::{MockDnsServer, MockZone};
use socksgate_application::ports::NameResolver;
use socksgate_infrastructure::dns::cache::ResolverCache;
use socksgate_infrastructure::dns::resolver::ResolverBuilder;
use socksgate_infrastructure::dns::selection::{AddressSelector, SeededSelector};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

/// Mock upstream plus a resolver pointed at it.
pub struct ResolverHarness {
    pub server: MockDnsServer,
    pub cache: Option<Arc<ResolverCache>>,
    pub resolver: Arc<dyn NameResolver>,
}

impl ResolverHarness {
    pub async fn new(zone: MockZone) -> Self {
        Self::build(zone, true, false).await
    }

    pub async fn uncached(zone: MockZone) -> Self {
        Self::build(zone, false, false).await
    }

    pub async fn prefer_ipv6(zone: MockZone) -> Self {
        Self::build(zone, true, true).await
    }

    pub async fn build(zone: MockZone, cached: bool, prefer_ipv6: bool) -> Self {
        Self::build_with_selector(zone, cached, prefer_ipv6, Arc::new(SeededSelector::new(7))).await
    }

    pub async fn build_with_selector(
        zone: MockZone,
        cached: bool,
        prefer_ipv6: bool,
        selector: Arc<dyn AddressSelector>,
    ) -> Self {
        let server = MockDnsServer::start(zone).await.unwrap();
        let cache = cached.then(|| Arc::new(ResolverCache::new()));

        let mut builder = ResolverBuilder::new()
            .with_upstream(server.addr())
            .prefer_ipv6(prefer_ipv6)
            .with_query_timeout(Duration::from_secs(2))
            .with_selector(selector);
        if let Some(cache) = &cache {
            builder = builder.with_cache(Arc::clone(cache));
        }

        Self {
            server,
            cache,
            resolver: builder.build(),
        }
    }

    pub fn cache(&self) -> &ResolverCache {
        self.cache.as_deref().unwrap()
    }
}

/// UDP socket that accepts queries and never answers.
pub async fn blackhole_upstream() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    (socket, addr)
}
