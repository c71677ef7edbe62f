use async_trait::async_trait;
use socksgate_application::ports::{NameResolver, RequestContext};
use socksgate_domain::{AddressFamily, DomainError};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::debug;

/// Resolver backed by the host's native resolver (`getaddrinfo`).
///
/// The platform keeps its own cache, so nothing is cached here.
pub struct SystemResolver {
    prefer_ipv6: bool,
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(prefer_ipv6: bool, timeout: Duration) -> Self {
        Self {
            prefer_ipv6,
            timeout,
        }
    }

    /// First address of the preferred family, else the first IPv4 address.
    fn pick(&self, addresses: &[IpAddr]) -> Option<(IpAddr, AddressFamily)> {
        let first_of = |family: AddressFamily| {
            addresses
                .iter()
                .copied()
                .find(|ip| family.matches(ip))
                .map(|ip| (ip, family))
        };

        if self.prefer_ipv6 {
            first_of(AddressFamily::V6).or_else(|| first_of(AddressFamily::V4))
        } else {
            first_of(AddressFamily::V4)
        }
    }

    async fn lookup_all(&self, hostname: &str) -> Result<Vec<IpAddr>, DomainError> {
        let lookup = tokio::net::lookup_host((hostname, 0));

        let resolved = tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| DomainError::QueryTimeout)?
            .map_err(|e| DomainError::IoError(format!("system lookup of {hostname}: {e}")))?;

        Ok(resolved.map(|addr: SocketAddr| addr.ip()).collect())
    }
}

#[async_trait]
impl NameResolver for SystemResolver {
    async fn resolve(&self, ctx: &RequestContext, hostname: &str) -> Result<IpAddr, DomainError> {
        let addresses = ctx.run(self.lookup_all(hostname)).await?;

        match self.pick(&addresses) {
            Some((ip, family)) => {
                debug!(domain = %hostname, ip = %ip, family = %family, "System resolver answered");
                Ok(ip)
            }
            None => Err(DomainError::NoAddresses {
                domain: hostname.to_string(),
                family: if self.prefer_ipv6 { "IPv6/IPv4" } else { "IPv4" }.to_string(),
            }),
        }
    }
}
