use super::network::NetworkMatcher;
use crate::config::PolicyConfig;
use crate::DomainError;
use std::collections::HashSet;

/// Validated, immutable admission policy.
///
/// Built once from [`PolicyConfig`]; every CIDR and address has already been
/// parsed, so evaluation never fails.
#[derive(Debug, Clone, Default)]
pub struct AdmissionPolicy {
    pub allowed_hostnames: HashSet<String>,
    pub rejected_hostnames: HashSet<String>,
    pub allowed_networks: NetworkMatcher,
    pub rejected_networks: NetworkMatcher,
    pub disable_bind: bool,
    pub disable_associate: bool,
}

impl AdmissionPolicy {
    pub fn from_config(config: &PolicyConfig) -> Result<Self, DomainError> {
        Ok(Self {
            allowed_hostnames: collect_hostnames(&config.allowed_hostnames),
            rejected_hostnames: collect_hostnames(&config.rejected_hostnames),
            allowed_networks: NetworkMatcher::new(&config.allowed_networks)?,
            rejected_networks: NetworkMatcher::new(&config.rejected_networks)?,
            disable_bind: config.disable_bind,
            disable_associate: config.disable_associate,
        })
    }

    /// No allow-list configured: every destination is admitted unless rejected.
    pub fn is_open(&self) -> bool {
        self.allowed_hostnames.is_empty() && self.allowed_networks.is_empty()
    }
}

// Hostnames are matched exactly as presented; only surrounding whitespace
// from list parsing is dropped.
fn collect_hostnames(entries: &[String]) -> HashSet<String> {
    entries
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
