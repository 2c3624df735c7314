//! RNG oracle for combat rolls, loot and respawn windows.
//!
//! The runtime plugs in an OS-seeded generator; tests use [`PcgRng`] with a
//! fixed seed so every roll is reproducible.

use core::sync::atomic::{AtomicU64, Ordering};

/// Source of randomness shared by concurrent tasks.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self) -> u32 {
        (self.next_u32() % 100) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32() % range)
    }

    /// Returns true with the given probability in percent.
    fn chance(&self, percent: u32) -> bool {
        percent > 0 && self.roll_d100() <= percent
    }
}

/// PCG-XSH-RR generator with its 64-bit state behind an atomic, so one
/// instance can be shared between tasks.
#[derive(Debug)]
pub struct PcgRng {
    state: AtomicU64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: AtomicU64::new(seed),
        }
    }

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl Default for PcgRng {
    fn default() -> Self {
        Self::new(0x853c_49e6_748f_ea9b)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self) -> u32 {
        let previous = self
            .state
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |state| {
                Some(Self::pcg_step(state))
            })
            .unwrap_or_else(|state| state);
        Self::pcg_output(Self::pcg_step(previous))
    }
}

/// Replays a fixed sequence of values, cycling when exhausted.
///
/// Lets tests force a specific roll (a crit, a miss) without searching seeds.
#[derive(Debug)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: AtomicU64,
}

impl ScriptedRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            cursor: AtomicU64::new(0),
        }
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) as usize % self.values.len();
        self.values[index]
    }
}
