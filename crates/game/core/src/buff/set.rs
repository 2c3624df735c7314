use std::collections::BTreeMap;

use super::clock::Clock;
use super::instance::{Buff, BuffSpecial};
use crate::env::BuffDefinition;
use crate::state::{BuffTypeId, CharacterFlags, CharacterId};
use crate::stats::StatDelta;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantOutcome {
    Created,
    /// An instance already existed; only its start time moved.
    Refreshed,
}

/// Live buffs of one character, at most one per buff type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuffSet {
    buffs: BTreeMap<BuffTypeId, Buff>,
}

impl BuffSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a set from persisted records. A later duplicate replaces an
    /// earlier one.
    pub fn from_records(records: impl IntoIterator<Item = Buff>) -> Self {
        Self {
            buffs: records
                .into_iter()
                .map(|buff| (buff.type_id, buff))
                .collect(),
        }
    }

    pub fn to_records(&self) -> Vec<Buff> {
        self.buffs.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }

    pub fn get(&self, id: BuffTypeId) -> Option<&Buff> {
        self.buffs.get(&id)
    }

    pub fn contains(&self, id: BuffTypeId) -> bool {
        self.buffs.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.buffs.values()
    }

    /// Creates an instance, or refreshes the start time of the live one.
    pub fn grant(
        &mut self,
        definition: &BuffDefinition,
        owner: CharacterId,
        plus: u8,
        clock: &dyn Clock,
    ) -> GrantOutcome {
        if let Some(existing) = self.buffs.get_mut(&definition.id) {
            existing.started_at = clock.now(existing.clock);
            return GrantOutcome::Refreshed;
        }
        self.buffs.insert(
            definition.id,
            Buff::from_definition(definition, owner, plus, clock),
        );
        GrantOutcome::Created
    }

    pub fn remove(&mut self, id: BuffTypeId) -> Option<Buff> {
        self.buffs.remove(&id)
    }

    /// Removes and returns every instance whose time is up.
    pub fn expire_due(&mut self, clock: &dyn Clock) -> Vec<Buff> {
        let due: Vec<BuffTypeId> = self
            .buffs
            .values()
            .filter(|buff| buff.is_expired(clock))
            .map(|buff| buff.type_id)
            .collect();
        due.into_iter()
            .filter_map(|id| self.buffs.remove(&id))
            .collect()
    }

    /// Sets the duration of every listed live buff to zero. Returns how many
    /// were affected.
    pub fn force_expire(&mut self, ids: &[BuffTypeId]) -> usize {
        let mut affected = 0;
        for id in ids {
            if let Some(buff) = self.buffs.get_mut(id) {
                buff.force_expire();
                affected += 1;
            }
        }
        affected
    }

    /// Sum of the deltas of every stat-granting buff.
    pub fn stat_delta(&self) -> StatDelta {
        self.buffs
            .values()
            .filter(|buff| buff.grants_stats())
            .map(|buff| buff.delta)
            .sum()
    }

    /// Behaviour flags implied by the live buffs.
    pub fn flags(&self) -> CharacterFlags {
        self.buffs
            .values()
            .fold(CharacterFlags::empty(), |flags, buff| {
                flags | buff.special.flag()
            })
    }

    pub fn expansion_active(&self) -> bool {
        self.buffs
            .values()
            .any(|buff| buff.special == BuffSpecial::BagExpansion)
    }

    /// Poison damage due at this instant: every poison buff hits once each
    /// `interval` units of its own clock after it started.
    pub fn poison_due(&self, clock: &dyn Clock, interval: u64) -> u32 {
        if interval == 0 {
            return 0;
        }
        self.buffs
            .values()
            .filter_map(|buff| match buff.special {
                BuffSpecial::Poison { damage } => {
                    let elapsed = clock.now(buff.clock).saturating_sub(buff.started_at);
                    (elapsed > 0 && elapsed % interval == 0).then_some(damage)
                }
                _ => None,
            })
            .fold(0u32, u32::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::{ClockKind, ClockReading};
    use crate::state::{Epoch, Tick};

    fn at(tick: u64) -> ClockReading {
        ClockReading::new(Tick(tick), Epoch(0))
    }

    fn shield() -> BuffDefinition {
        BuffDefinition::new(BuffTypeId(10), ClockKind::CharacterTick, 600).with_delta(StatDelta {
            defense: 40,
            ..StatDelta::ZERO
        })
    }

    #[test]
    fn regrant_refreshes_instead_of_stacking() {
        let mut set = BuffSet::new();
        assert_eq!(
            set.grant(&shield(), CharacterId(1), 0, &at(1_000)),
            GrantOutcome::Created
        );
        assert_eq!(
            set.grant(&shield(), CharacterId(1), 0, &at(1_300)),
            GrantOutcome::Refreshed
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(BuffTypeId(10)).unwrap().started_at, 1_300);
        assert_eq!(set.stat_delta().defense, 40);
    }

    #[test]
    fn expired_buffs_are_removed_once() {
        let mut set = BuffSet::new();
        set.grant(&shield(), CharacterId(1), 0, &at(1_000));
        assert!(set.expire_due(&at(1_599)).is_empty());
        let expired = set.expire_due(&at(1_600));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].delta.defense, 40);
        assert!(set.expire_due(&at(1_601)).is_empty());
        assert!(set.is_empty());
    }

    #[test]
    fn force_expire_only_touches_listed_buffs() {
        let mut set = BuffSet::new();
        set.grant(&shield(), CharacterId(1), 0, &at(0));
        let permanent = BuffDefinition::new(BuffTypeId(11), ClockKind::CharacterTick, 0);
        set.grant(&permanent, CharacterId(1), 0, &at(0));

        assert_eq!(set.force_expire(&[BuffTypeId(11), BuffTypeId(99)]), 1);
        let expired = set.expire_due(&at(1));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].type_id, BuffTypeId(11));
        assert!(set.contains(BuffTypeId(10)));
    }

    #[test]
    fn poison_drains_on_interval_and_skips_pipeline() {
        let mut set = BuffSet::new();
        let poison = BuffDefinition::new(BuffTypeId(20), ClockKind::CharacterTick, 30)
            .with_special(BuffSpecial::Poison { damage: 7 })
            .with_delta(StatDelta {
                defense: -100,
                ..StatDelta::ZERO
            });
        set.grant(&poison, CharacterId(1), 0, &at(100));

        assert_eq!(set.poison_due(&at(100), 3), 0);
        assert_eq!(set.poison_due(&at(102), 3), 0);
        assert_eq!(set.poison_due(&at(103), 3), 7);
        assert_eq!(set.stat_delta(), StatDelta::ZERO);
    }

    #[test]
    fn flags_follow_specials() {
        let mut set = BuffSet::new();
        let stun = BuffDefinition::new(BuffTypeId(30), ClockKind::CharacterTick, 5)
            .with_special(BuffSpecial::Paralysis);
        set.grant(&stun, CharacterId(1), 0, &at(0));
        assert!(set.flags().contains(CharacterFlags::PARALYZED));
        set.expire_due(&at(5));
        assert!(set.flags().is_empty());
    }
}
