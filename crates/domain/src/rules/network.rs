use crate::DomainError;
use ipnetwork::IpNetwork;
use std::net::IpAddr;

/// Parse a policy entry into a network.
///
/// A bare address is a single-host network (/32 for IPv4, /128 for IPv6).
pub fn parse_network(entry: &str) -> Result<IpNetwork, DomainError> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Err(DomainError::InvalidCidr("entry cannot be empty".to_string()));
    }

    if entry.contains('/') {
        return entry
            .parse::<IpNetwork>()
            .map_err(|e| DomainError::InvalidCidr(format!("{entry}: {e}")));
    }

    let ip: IpAddr = entry
        .parse()
        .map_err(|e| DomainError::InvalidIpAddress(format!("{entry}: {e}")))?;
    Ok(IpNetwork::from(ip))
}

/// Ordered set of networks tested by containment.
#[derive(Debug, Clone, Default)]
pub struct NetworkMatcher {
    networks: Vec<IpNetwork>,
}

impl NetworkMatcher {
    pub fn new<I, S>(entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let networks = entries
            .into_iter()
            .map(|entry| parse_network(entry.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { networks })
    }

    /// True when any configured network contains `ip`.
    ///
    /// IPv4-mapped IPv6 addresses are matched as their IPv4 form.
    pub fn contains(&self, ip: IpAddr) -> bool {
        let ip = ip.to_canonical();
        self.networks.iter().any(|network| network.contains(ip))
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn networks(&self) -> &[IpNetwork] {
        &self.networks
    }
}
