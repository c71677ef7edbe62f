use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Upstream answered {rcode} for {domain}")]
    UpstreamRcode { domain: String, rcode: String },

    #[error("No {family} addresses found for {domain}")]
    NoAddresses { domain: String, family: String },

    #[error("Transport error talking to {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Resolution cancelled")]
    Cancelled,

    #[error("Destination has neither hostname nor address")]
    EmptyDestination,
}

impl DomainError {
    /// Whether an address-family fallback may recover from this error.
    ///
    /// A cancelled request is never retried with the other family.
    pub fn is_recoverable_by_fallback(&self) -> bool {
        !matches!(self, DomainError::Cancelled)
    }
}
