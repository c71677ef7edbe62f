//! Admission rules: policy compiled from configuration and the engine that
//! turns a connection request into an allow/deny verdict.

pub mod engine;
pub mod network;
pub mod policy;

pub use engine::RuleEngine;
pub use network::{parse_network, NetworkMatcher};
pub use policy::AdmissionPolicy;
