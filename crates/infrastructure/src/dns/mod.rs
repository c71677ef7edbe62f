pub mod cache;
pub mod cache_sweeper;
pub mod forwarding;
pub mod resolver;
pub mod selection;
pub mod transport;

pub use cache::{CacheMetrics, CacheStats, ResolverCache};
pub use cache_sweeper::CacheSweeper;
pub use resolver::{ResolverBuilder, SystemResolver, UpstreamResolver};
pub use selection::{AddressSelector, FastrandSelector, SeededSelector};
