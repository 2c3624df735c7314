//! Server epoch sources.
//!
//! Buffs on the logical clock read the owning character's tick counter; the
//! wall-clock side comes from an [`EpochSource`] injected into the runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use mmo_core::Epoch;

pub trait EpochSource: Send + Sync {
    fn now(&self) -> Epoch;
}

/// Seconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemEpoch;

impl EpochSource for SystemEpoch {
    fn now(&self) -> Epoch {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        Epoch(seconds)
    }
}

/// Hand-driven epoch for tests.
#[derive(Debug, Default)]
pub struct ManualEpoch {
    seconds: AtomicU64,
}

impl ManualEpoch {
    pub fn new(start: u64) -> Self {
        Self {
            seconds: AtomicU64::new(start),
        }
    }

    pub fn advance(&self, seconds: u64) {
        self.seconds.fetch_add(seconds, Ordering::SeqCst);
    }

    pub fn set(&self, seconds: u64) {
        self.seconds.store(seconds, Ordering::SeqCst);
    }
}

impl EpochSource for ManualEpoch {
    fn now(&self) -> Epoch {
        Epoch(self.seconds.load(Ordering::SeqCst))
    }
}
