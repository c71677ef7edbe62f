use super::super::cache::ResolverCache;
use super::super::forwarding::{DnsAnswer, MessageBuilder, ResponseParser};
use super::super::selection::AddressSelector;
use super::super::transport::Transport;
use async_trait::async_trait;
use socksgate_application::ports::{NameResolver, RequestContext};
use socksgate_domain::{AddressFamily, DomainError};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Every address of one family that an upstream answer carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressLookup {
    pub addresses: Vec<IpAddr>,
    /// Smallest TTL of the answer set, in seconds.
    pub ttl: u32,
}

/// Sends single-family address queries to one DNS server.
///
/// Queries go over UDP; a truncated reply is retried once over TCP.
pub struct UpstreamClient {
    server: SocketAddr,
    udp: Transport,
    tcp: Transport,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(server: SocketAddr, timeout: Duration) -> Self {
        Self {
            server,
            udp: Transport::udp(server),
            tcp: Transport::tcp(server),
            timeout,
        }
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    pub async fn lookup(
        &self,
        hostname: &str,
        family: AddressFamily,
    ) -> Result<AddressLookup, DomainError> {
        let (id, query) = MessageBuilder::build_query(hostname, family)?;

        let mut answer = self.exchange(&self.udp, &query, id, family).await?;
        if answer.truncated {
            debug!(
                server = %self.server,
                domain = %hostname,
                "Truncated UDP response, retrying over TCP"
            );
            answer = self.exchange(&self.tcp, &query, id, family).await?;
        }

        if !answer.is_success() {
            return Err(DomainError::UpstreamRcode {
                domain: hostname.to_string(),
                rcode: ResponseParser::rcode_to_status(answer.rcode).to_string(),
            });
        }

        if answer.addresses.is_empty() {
            return Err(DomainError::NoAddresses {
                domain: hostname.to_string(),
                family: family.to_string(),
            });
        }

        Ok(AddressLookup {
            ttl: answer.min_ttl.unwrap_or(0),
            addresses: answer.addresses,
        })
    }

    async fn exchange(
        &self,
        transport: &Transport,
        query: &[u8],
        id: u16,
        family: AddressFamily,
    ) -> Result<DnsAnswer, DomainError> {
        let response = transport.send(query, self.timeout).await?;
        debug!(
            server = %self.server,
            protocol = transport.protocol_name(),
            bytes = response.bytes.len(),
            "Upstream exchange complete"
        );
        ResponseParser::parse(&response.bytes, id, family)
    }
}

/// Resolver backed by a configured upstream DNS server.
pub struct UpstreamResolver {
    client: UpstreamClient,
    cache: Option<Arc<ResolverCache>>,
    selector: Arc<dyn AddressSelector>,
    prefer_ipv6: bool,
}

impl UpstreamResolver {
    pub fn new(
        client: UpstreamClient,
        cache: Option<Arc<ResolverCache>>,
        selector: Arc<dyn AddressSelector>,
        prefer_ipv6: bool,
    ) -> Self {
        Self {
            client,
            cache,
            selector,
            prefer_ipv6,
        }
    }

    pub fn cache(&self) -> Option<&Arc<ResolverCache>> {
        self.cache.as_ref()
    }

    fn families(&self) -> &'static [AddressFamily] {
        if self.prefer_ipv6 {
            &[AddressFamily::V6, AddressFamily::V4]
        } else {
            &[AddressFamily::V4]
        }
    }

    /// Query each family in preference order until one yields addresses.
    async fn lookup(
        &self,
        ctx: &RequestContext,
        hostname: &str,
    ) -> Result<AddressLookup, DomainError> {
        let families = self.families();
        let mut last_error = None;

        for (attempt, family) in families.iter().enumerate() {
            match ctx.run(self.client.lookup(hostname, *family)).await {
                Ok(lookup) => return Ok(lookup),
                Err(e) if e.is_recoverable_by_fallback() && attempt + 1 < families.len() => {
                    debug!(
                        domain = %hostname,
                        family = %family,
                        error = %e,
                        "Lookup failed, falling back to next address family"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| DomainError::NoAddresses {
            domain: hostname.to_string(),
            family: AddressFamily::V4.to_string(),
        }))
    }
}

#[async_trait]
impl NameResolver for UpstreamResolver {
    async fn resolve(&self, ctx: &RequestContext, hostname: &str) -> Result<IpAddr, DomainError> {
        if ctx.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        if let Some(cache) = &self.cache {
            if let Some(addresses) = cache.get(hostname) {
                if let Some(ip) = self.selector.select(&addresses) {
                    debug!(domain = %hostname, ip = %ip, "Cache HIT");
                    return Ok(ip);
                }
            }
            debug!(domain = %hostname, "Cache MISS");
        }

        let lookup = self.lookup(ctx, hostname).await.inspect_err(|e| {
            if !matches!(e, DomainError::Cancelled) {
                warn!(
                    server = %self.client.server(),
                    domain = %hostname,
                    error = %e,
                    "Upstream resolution failed"
                );
            }
        })?;

        let addresses: Arc<[IpAddr]> = lookup.addresses.into();

        if let Some(cache) = &self.cache {
            cache.insert(hostname, Arc::clone(&addresses), lookup.ttl);
        }

        self.selector
            .select(&addresses)
            .ok_or_else(|| DomainError::NoAddresses {
                domain: hostname.to_string(),
                family: "any".to_string(),
            })
    }
}
