//! SocksGate Domain Layer
pub mod config;
pub mod connection;
pub mod errors;
pub mod rules;

pub use config::{CliOverrides, Config, ConfigError, PolicyConfig, ResolverConfig};
pub use connection::{AddressFamily, Command, ConnectionRequest, Destination};
pub use errors::DomainError;
pub use rules::{AdmissionPolicy, NetworkMatcher, RuleEngine};
