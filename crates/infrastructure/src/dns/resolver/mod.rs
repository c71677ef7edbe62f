//! Hostname resolution
//!
//! Two interchangeable [`NameResolver`](socksgate_application::ports::NameResolver)
//! implementations, chosen by [`ResolverBuilder`] from configuration:
//!
//! - **System**: the host's native resolver, never cached
//! - **Upstream**: direct A/AAAA queries to one DNS server, with an optional
//!   hostname-keyed cache and random selection across the answer set
//!
//! ## Example Usage
//!
//! ```no_run
//! use socksgate_infrastructure::dns::resolver::ResolverBuilder;
//!
//! let resolver = ResolverBuilder::new()
//!     .with_upstream("198.51.100.53:53".parse().unwrap())
//!     .prefer_ipv6(true)
//!     .build();
//! ```

pub mod builder;
pub mod system;
pub mod upstream;

pub use builder::ResolverBuilder;
pub use system::SystemResolver;
pub use upstream::{AddressLookup, UpstreamClient, UpstreamResolver};
