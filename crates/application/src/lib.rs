//! SocksGate Application Layer
//!
//! Ports implemented by the infrastructure crate and the admission use case
//! the proxy front end drives for every connection request.

pub mod ports;
pub mod use_cases;
