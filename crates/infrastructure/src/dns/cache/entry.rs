use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// One upstream answer: every address it returned, valid until `expires_at`.
///
/// The address list is shared (`Arc<[IpAddr]>`) and never mutated after
/// insertion, so a hit is an atomic increment rather than a copy.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub addresses: Arc<[IpAddr]>,
    pub ttl: u32,
    pub inserted_at: Instant,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn new(addresses: Arc<[IpAddr]>, ttl: u32) -> Self {
        let inserted_at = Instant::now();
        Self {
            addresses,
            ttl,
            inserted_at,
            expires_at: inserted_at + Duration::from_secs(u64::from(ttl)),
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Seconds of validity left, rounded down.
    pub fn remaining_ttl(&self) -> u32 {
        self.expires_at
            .saturating_duration_since(Instant::now())
            .as_secs()
            .min(u64::from(u32::MAX)) as u32
    }
}
