pub mod builders;
pub mod dns_server_mock;

pub use builders::{blackhole_upstream, ResolverHarness};
pub use dns_server_mock::{MockDnsServer, MockZone};
