// Resolver cache: hostname -> full address set, expiry checked at lookup.

pub mod entry;
pub mod metrics;
pub mod storage;

pub use entry::CacheEntry;
pub use metrics::{CacheMetrics, CacheStats};
pub use storage::ResolverCache;
