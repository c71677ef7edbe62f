//! Configuration module for SocksGate
//!
//! - `root`: Main configuration and CLI overrides
//! - `policy`: Destination allow/reject lists and command kill-switches
//! - `resolver`: Upstream DNS, address family preference and caching
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod errors;
pub mod logging;
pub mod policy;
pub mod resolver;
pub mod root;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use policy::PolicyConfig;
pub use resolver::ResolverConfig;
pub use root::{CliOverrides, Config};
