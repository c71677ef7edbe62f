use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Destination resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Upstream DNS server address. When unset, the system resolver is used
    /// and nothing is cached. Accepts "1.1.1.1", "2001:db8::53",
    /// "[2001:db8::53]" or a full "ip:port".
    #[serde(default)]
    pub upstream_host: Option<String>,

    #[serde(default = "default_upstream_port")]
    pub upstream_port: u16,

    #[serde(default)]
    pub prefer_ipv6: bool,

    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Per-exchange timeout in milliseconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    /// Seconds between background sweeps of expired cache entries
    #[serde(default = "default_cache_sweep_interval")]
    pub cache_sweep_interval: u64,
}

impl ResolverConfig {
    /// Upstream socket address, or `None` when the system resolver is configured.
    pub fn upstream_addr(&self) -> Result<Option<SocketAddr>, ConfigError> {
        let host = match self.upstream_host.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(host) => host,
        };

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(Some(addr));
        }

        let bare = host.trim_start_matches('[').trim_end_matches(']');
        bare.parse::<IpAddr>()
            .map(|ip| Some(SocketAddr::new(ip, self.upstream_port)))
            .map_err(|_| {
                ConfigError::InvalidUpstream(format!(
                    "'{host}' is not an IP address (hostnames are not supported for the upstream)"
                ))
            })
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            upstream_host: None,
            upstream_port: default_upstream_port(),
            prefer_ipv6: false,
            cache_enabled: true,
            query_timeout: default_query_timeout(),
            cache_sweep_interval: default_cache_sweep_interval(),
        }
    }
}

fn default_upstream_port() -> u16 {
    53
}

fn default_true() -> bool {
    true
}

fn default_query_timeout() -> u64 {
    2000
}

fn default_cache_sweep_interval() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_host(host: &str) -> ResolverConfig {
        ResolverConfig {
            upstream_host: Some(host.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_upstream_means_system_resolver() {
        assert_eq!(ResolverConfig::default().upstream_addr().unwrap(), None);
        assert_eq!(with_host("").upstream_addr().unwrap(), None);
    }

    #[test]
    fn test_upstream_uses_configured_port() {
        let mut config = with_host("9.9.9.9");
        config.upstream_port = 5353;
        assert_eq!(
            config.upstream_addr().unwrap(),
            Some("9.9.9.9:5353".parse().unwrap())
        );
    }

    #[test]
    fn test_upstream_ipv6_forms() {
        let expected: SocketAddr = "[2001:db8::53]:53".parse().unwrap();
        assert_eq!(with_host("2001:db8::53").upstream_addr().unwrap(), Some(expected));
        assert_eq!(with_host("[2001:db8::53]").upstream_addr().unwrap(), Some(expected));
        assert_eq!(
            with_host("[2001:db8::53]:53").upstream_addr().unwrap(),
            Some(expected)
        );
    }

    #[test]
    fn test_upstream_hostname_rejected() {
        assert!(matches!(
            with_host("dns.example.com").upstream_addr(),
            Err(ConfigError::InvalidUpstream(_))
        ));
    }
}
