//! Current HP and CHI as atomics.
//!
//! Damage from another character's task is a single compare-and-swap on the
//! target, so no lock ever spans two characters.

use std::sync::atomic::{AtomicU32, Ordering};

/// What one damage application did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageApplied {
    pub dealt: u32,
    pub remaining: u32,
    /// This call took HP from above zero to exactly zero. At most one call
    /// per life observes `true`.
    pub lethal: bool,
}

#[derive(Debug, Default)]
pub struct Vitals {
    hp: AtomicU32,
    chi: AtomicU32,
}

impl Vitals {
    pub fn new(hp: u32, chi: u32) -> Self {
        Self {
            hp: AtomicU32::new(hp),
            chi: AtomicU32::new(chi),
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp.load(Ordering::Acquire)
    }

    pub fn chi(&self) -> u32 {
        self.chi.load(Ordering::Acquire)
    }

    pub fn is_dead(&self) -> bool {
        self.hp() == 0
    }

    /// Subtracts `amount`, saturating at zero. A target already at zero is
    /// left alone.
    pub fn damage(&self, amount: u32) -> DamageApplied {
        match self
            .hp
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |hp| {
                (hp > 0).then(|| hp.saturating_sub(amount))
            }) {
            Ok(previous) => {
                let remaining = previous.saturating_sub(amount);
                DamageApplied {
                    dealt: previous - remaining,
                    remaining,
                    lethal: remaining == 0,
                }
            }
            Err(_) => DamageApplied::default(),
        }
    }

    /// Heals up to `max`. Dead targets stay dead. Returns the amount healed.
    pub fn heal(&self, amount: u32, max: u32) -> u32 {
        Self::raise(&self.hp, amount, max, false)
    }

    /// Restores CHI up to `max`. Returns the amount restored.
    pub fn restore_chi(&self, amount: u32, max: u32) -> u32 {
        Self::raise(&self.chi, amount, max, true)
    }

    /// Spends `cost` CHI if available.
    pub fn spend_chi(&self, cost: u32) -> bool {
        self.chi
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |chi| chi.checked_sub(cost))
            .is_ok()
    }

    /// Lowers both values to new maxima after a stat change.
    pub fn clamp(&self, max_hp: u32, max_chi: u32) {
        self.hp.fetch_min(max_hp, Ordering::AcqRel);
        self.chi.fetch_min(max_chi, Ordering::AcqRel);
    }

    /// Full HP and CHI, used on respawn and level up.
    pub fn refill(&self, max_hp: u32, max_chi: u32) {
        self.hp.store(max_hp, Ordering::Release);
        self.chi.store(max_chi, Ordering::Release);
    }

    fn raise(value: &AtomicU32, amount: u32, max: u32, from_zero: bool) -> u32 {
        match value.fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
            if (current == 0 && !from_zero) || current >= max {
                return None;
            }
            Some(current.saturating_add(amount).min(max))
        }) {
            Ok(previous) => previous.saturating_add(amount).min(max) - previous,
            Err(_) => 0,
        }
    }
}
