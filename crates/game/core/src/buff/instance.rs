use super::clock::{Clock, ClockKind};
use crate::env::BuffDefinition;
use crate::state::{BuffTypeId, CharacterFlags, CharacterId};
use crate::stats::StatDelta;

/// Behaviour beyond a plain stat delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffSpecial {
    #[default]
    None,
    /// Direct HP drain every `GameConfig::poison_interval` ticks. Its delta is
    /// ignored by the stat pipeline.
    Poison { damage: u32 },
    Paralysis,
    Confusion,
    Invisibility,
    /// Unlocks the expanded bag range while live.
    BagExpansion,
}

impl BuffSpecial {
    pub fn flag(self) -> CharacterFlags {
        match self {
            Self::Paralysis => CharacterFlags::PARALYZED,
            Self::Confusion => CharacterFlags::CONFUSED,
            Self::Invisibility => CharacterFlags::INVISIBLE,
            Self::None | Self::Poison { .. } | Self::BagExpansion => CharacterFlags::empty(),
        }
    }

    pub fn is_poison(self) -> bool {
        matches!(self, Self::Poison { .. })
    }
}

/// A live status-effect instance.
///
/// The delta is snapshotted from the definition at creation, so later data
/// changes never alter what an existing instance removes on expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buff {
    pub type_id: BuffTypeId,
    pub owner: CharacterId,
    pub clock: ClockKind,
    pub started_at: u64,
    /// `0` with `can_expire == false` means permanent.
    pub duration: u64,
    pub can_expire: bool,
    pub delta: StatDelta,
    pub special: BuffSpecial,
    /// Plus level of the skill that granted it.
    pub plus: u8,
}

impl Buff {
    pub fn from_definition(
        definition: &BuffDefinition,
        owner: CharacterId,
        plus: u8,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            type_id: definition.id,
            owner,
            clock: definition.clock,
            started_at: clock.now(definition.clock),
            duration: definition.duration,
            can_expire: definition.expires(),
            delta: definition.delta_at(plus),
            special: definition.special,
            plus,
        }
    }

    pub fn expires_at(&self) -> Option<u64> {
        self.can_expire
            .then(|| self.started_at.saturating_add(self.duration))
    }

    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        self.expires_at()
            .is_some_and(|deadline| deadline <= clock.now(self.clock))
    }

    /// Time left on this buff's own clock. `None` for permanent buffs.
    pub fn remaining(&self, clock: &dyn Clock) -> Option<u64> {
        self.expires_at()
            .map(|deadline| deadline.saturating_sub(clock.now(self.clock)))
    }

    /// Makes the buff due on the next expiry check.
    pub fn force_expire(&mut self) {
        self.duration = 0;
        self.can_expire = true;
    }

    /// Whether this buff contributes its delta to the stat pipeline.
    pub fn grants_stats(&self) -> bool {
        !self.special.is_poison()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::ClockReading;
    use crate::state::{Epoch, Tick};

    fn at(tick: u64) -> ClockReading {
        ClockReading::new(Tick(tick), Epoch(0))
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let definition = BuffDefinition::new(BuffTypeId(1), ClockKind::CharacterTick, 600);
        let buff = Buff::from_definition(&definition, CharacterId(1), 0, &at(1_000));
        assert_eq!(buff.started_at, 1_000);
        assert!(!buff.is_expired(&at(1_599)));
        assert!(buff.is_expired(&at(1_600)));
        assert_eq!(buff.remaining(&at(1_100)), Some(500));
    }

    #[test]
    fn zero_duration_is_permanent_unless_told_otherwise() {
        let definition = BuffDefinition::new(BuffTypeId(2), ClockKind::CharacterTick, 0);
        let mut buff = Buff::from_definition(&definition, CharacterId(1), 0, &at(5));
        assert!(!buff.is_expired(&at(u64::MAX)));

        buff.force_expire();
        assert!(buff.is_expired(&at(5)));

        let timed = definition.with_can_expire(true);
        let buff = Buff::from_definition(&timed, CharacterId(1), 0, &at(5));
        assert!(buff.is_expired(&at(5)));
    }

    #[test]
    fn server_epoch_buffs_ignore_character_ticks() {
        let definition = BuffDefinition::new(BuffTypeId(3), ClockKind::ServerEpoch, 60);
        let clock = ClockReading::new(Tick(0), Epoch(1_000));
        let buff = Buff::from_definition(&definition, CharacterId(1), 0, &clock);
        assert!(!buff.is_expired(&ClockReading::new(Tick(10_000), Epoch(1_059))));
        assert!(buff.is_expired(&ClockReading::new(Tick(0), Epoch(1_060))));
    }
}
