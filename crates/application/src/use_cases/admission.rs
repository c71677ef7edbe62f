use crate::ports::{NameResolver, RequestContext};
use socksgate_domain::{ConnectionRequest, DomainError, RuleEngine};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Outcome of admitting one connection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Policy allows the request; `request.destination.ip` holds the address to dial.
    Allowed(ConnectionRequest),
    /// Policy refuses the request.
    Denied(ConnectionRequest),
    /// The destination hostname could not be resolved; the connection must be refused.
    Unreachable {
        request: ConnectionRequest,
        reason: DomainError,
    },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed(_))
    }

    pub fn request(&self) -> &ConnectionRequest {
        match self {
            Admission::Allowed(request)
            | Admission::Denied(request)
            | Admission::Unreachable { request, .. } => request,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Admission::Allowed(_) => "allow",
            Admission::Denied(_) => "deny",
            Admission::Unreachable { .. } => "unreachable",
        }
    }
}

impl fmt::Display for Admission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve-then-evaluate flow run by the protocol engine for each request.
///
/// The resolver and the rule engine never talk to each other; this use case
/// is the only place their results meet.
pub struct AdmitConnectionUseCase {
    resolver: Arc<dyn NameResolver>,
    rules: Arc<RuleEngine>,
}

impl AdmitConnectionUseCase {
    pub fn new(resolver: Arc<dyn NameResolver>, rules: Arc<RuleEngine>) -> Self {
        Self { resolver, rules }
    }

    /// Errors only for malformed requests and cancellation; resolution
    /// failures come back as [`Admission::Unreachable`].
    #[instrument(skip(self, ctx, request), fields(command = %request.command, destination = %request.destination))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        mut request: ConnectionRequest,
    ) -> Result<Admission, DomainError> {
        if request.destination.hostname.is_none() && request.destination.ip.is_none() {
            return Err(DomainError::EmptyDestination);
        }

        if request.destination.needs_resolution() {
            let hostname = request
                .destination
                .hostname
                .clone()
                .ok_or(DomainError::EmptyDestination)?;

            match self.resolver.resolve(ctx, &hostname).await {
                Ok(ip) => {
                    request.destination = request.destination.with_resolved(ip);
                }
                Err(DomainError::Cancelled) => return Err(DomainError::Cancelled),
                Err(reason) => {
                    debug!(error = %reason, "Destination unreachable");
                    return Ok(Admission::Unreachable { request, reason });
                }
            }
        }

        if self.rules.evaluate(&request) {
            debug!("Connection allowed");
            Ok(Admission::Allowed(request))
        } else {
            debug!("Connection denied by policy");
            Ok(Admission::Denied(request))
        }
    }
}
