//! Structured result of a player-facing operation.
//!
//! A presentation layer turns these into packets; nothing here knows about
//! wire formats.

use mmo_core::{AttackResult, DerivedStats, Rejection, SlotIndex};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub succeeded: bool,
    /// Set when a business rule rejected the action.
    pub rejection: Option<Rejection>,
    /// Short user-visible text for the rejection.
    pub message: Option<String>,
    /// Slots whose content changed, in the order they were touched.
    pub affected_slots: Vec<SlotIndex>,
    /// Totals after the action when it recomputed stats.
    pub stats: Option<DerivedStats>,
    pub attack: Option<AttackResult>,
}

impl ActionResult {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            ..Self::default()
        }
    }

    pub fn rejected(rejection: Rejection) -> Self {
        Self {
            succeeded: false,
            rejection: Some(rejection),
            message: Some(rejection.message()),
            ..Self::default()
        }
    }

    /// A lookup failed and the action silently did nothing.
    pub fn aborted() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_slots(mut self, slots: impl IntoIterator<Item = SlotIndex>) -> Self {
        self.affected_slots.extend(slots);
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Option<DerivedStats>) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_attack(mut self, attack: AttackResult) -> Self {
        self.attack = Some(attack);
        self
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}
