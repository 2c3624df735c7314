//! OS-seeded randomness for live servers.
use std::sync::Mutex;

use mmo_core::RngOracle;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// [`RngOracle`] backed by a `rand` generator seeded from OS entropy.
#[derive(Debug)]
pub struct SystemRng {
    inner: Mutex<StdRng>,
}

impl SystemRng {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl Default for SystemRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngOracle for SystemRng {
    fn next_u32(&self) -> u32 {
        match self.inner.lock() {
            Ok(mut rng) => rng.next_u32(),
            Err(poisoned) => poisoned.into_inner().next_u32(),
        }
    }
}
