use super::errors::ConfigError;
use super::logging::{LoggingConfig, LOG_LEVELS};
use super::policy::PolicyConfig;
use super::resolver::ResolverConfig;
use crate::rules::AdmissionPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line or through the environment.
///
/// Every field is optional; a `Some` value replaces whatever the config file
/// (or the built-in default) says.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub allowed_hostnames: Option<Vec<String>>,
    pub rejected_hostnames: Option<Vec<String>>,
    pub allowed_networks: Option<Vec<String>>,
    pub rejected_networks: Option<Vec<String>>,
    pub disable_bind: Option<bool>,
    pub disable_associate: Option<bool>,
    pub dns_host: Option<String>,
    pub dns_port: Option<u16>,
    pub cache_enabled: Option<bool>,
    pub prefer_ipv6: Option<bool>,
    pub query_timeout: Option<u64>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from an optional TOML file and apply overrides.
    ///
    /// Does not validate; call [`Config::validate`] before use.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(hosts) = overrides.allowed_hostnames {
            self.policy.allowed_hostnames = hosts;
        }
        if let Some(hosts) = overrides.rejected_hostnames {
            self.policy.rejected_hostnames = hosts;
        }
        if let Some(networks) = overrides.allowed_networks {
            self.policy.allowed_networks = networks;
        }
        if let Some(networks) = overrides.rejected_networks {
            self.policy.rejected_networks = networks;
        }
        if let Some(disable) = overrides.disable_bind {
            self.policy.disable_bind = disable;
        }
        if let Some(disable) = overrides.disable_associate {
            self.policy.disable_associate = disable;
        }
        if let Some(host) = overrides.dns_host {
            self.resolver.upstream_host = Some(host);
        }
        if let Some(port) = overrides.dns_port {
            self.resolver.upstream_port = port;
        }
        if let Some(enabled) = overrides.cache_enabled {
            self.resolver.cache_enabled = enabled;
        }
        if let Some(prefer) = overrides.prefer_ipv6 {
            self.resolver.prefer_ipv6 = prefer;
        }
        if let Some(timeout) = overrides.query_timeout {
            self.resolver.query_timeout = timeout;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Reject malformed values up front so request handling never sees them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.admission_policy()?;
        self.resolver.upstream_addr()?;

        if self.resolver.query_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                field: "resolver.query_timeout",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.resolver.cache_sweep_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "resolver.cache_sweep_interval",
                reason: "must be greater than zero".to_string(),
            });
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.logging.level.clone()));
        }

        Ok(())
    }

    pub fn admission_policy(&self) -> Result<AdmissionPolicy, ConfigError> {
        AdmissionPolicy::from_config(&self.policy)
            .map_err(|e| ConfigError::InvalidPolicy(e.to_string()))
    }
}
