use super::RequestContext;
use async_trait::async_trait;
use socksgate_domain::DomainError;
use std::net::IpAddr;

/// Maps a destination hostname to the single address the proxy dials.
///
/// Implementations may block on network I/O and must give up with
/// [`DomainError::Cancelled`] once `ctx` is cancelled.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(&self, ctx: &RequestContext, hostname: &str) -> Result<IpAddr, DomainError>;
}
