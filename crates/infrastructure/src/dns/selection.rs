use std::net::IpAddr;
use std::sync::Mutex;

/// Chooses which address of a multi-record answer a connection is sent to.
///
/// Picking uniformly at random spreads connections over every A/AAAA record
/// while the answer itself stays cached for its TTL.
pub trait AddressSelector: Send + Sync {
    /// Index in `0..len`. Never called with `len == 0`.
    fn pick_index(&self, len: usize) -> usize;

    fn select(&self, addresses: &[IpAddr]) -> Option<IpAddr> {
        match addresses.len() {
            0 => None,
            1 => Some(addresses[0]),
            len => addresses.get(self.pick_index(len)).copied(),
        }
    }
}

/// Uniform selection using fastrand's thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct FastrandSelector;

impl AddressSelector for FastrandSelector {
    #[inline]
    fn pick_index(&self, len: usize) -> usize {
        fastrand::usize(..len)
    }
}

/// Uniform selection from a seeded generator, for reproducible sequences.
#[derive(Debug)]
pub struct SeededSelector {
    rng: Mutex<fastrand::Rng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }
}

impl AddressSelector for SeededSelector {
    fn pick_index(&self, len: usize) -> usize {
        match self.rng.lock() {
            Ok(mut rng) => rng.usize(..len),
            Err(poisoned) => poisoned.into_inner().usize(..len),
        }
    }
}
