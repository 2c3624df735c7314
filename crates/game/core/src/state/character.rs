//! Persisted character record and transient behaviour flags.

use bitflags::bitflags;

use super::common::{CharacterId, Position, SkillId, Tick};

/// Job class. Drives the base HP/CHI formula and base attack speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JobClass {
    #[default]
    Novice,
    Warrior,
    Assassin,
    Archer,
    Monk,
    Healer,
}

/// Allegiance. `Neutral` characters cannot be attacked outside a duel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Faction {
    #[default]
    Neutral,
    Order,
    Chaos,
}

impl Faction {
    /// Returns true if members of the two factions may fight without a duel.
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != Faction::Neutral && other != Faction::Neutral && self != other
    }
}

/// A skill or job passive the character has learned from the skill book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearnedSkill {
    pub skill: SkillId,
    /// Upgrade ("plus") level of the skill.
    pub plus: u8,
}

impl LearnedSkill {
    pub const fn new(skill: SkillId, plus: u8) -> Self {
        Self { skill, plus }
    }
}

/// Persisted character attributes other than stats, inventory and buffs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub name: String,
    pub class: JobClass,
    pub level: u16,
    pub exp: u64,
    pub faction: Faction,
    pub position: Position,
    pub gold: u64,
    /// Accumulated wear in `0..=GameConfig::max_injury`.
    pub injury: u32,
    /// Learned active skills and job passives.
    pub skills: Vec<LearnedSkill>,
    pub npc_kills: u64,
    /// Character-local clock. Only advances while the character is online.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick: Tick,
}

impl CharacterRecord {
    /// Fresh level-1 character at the given position.
    pub fn new(id: CharacterId, name: impl Into<String>, class: JobClass, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            level: 1,
            exp: 0,
            faction: Faction::Neutral,
            position,
            gold: 0,
            injury: 0,
            skills: Vec::new(),
            npc_kills: 0,
            tick: Tick(0),
        }
    }

    /// Plus level of a learned skill, if the character knows it.
    pub fn skill_plus(&self, skill: SkillId) -> Option<u8> {
        self.skills
            .iter()
            .find(|learned| learned.skill == skill)
            .map(|learned| learned.plus)
    }
}

bitflags! {
    /// Transient combat/behaviour flags. Never persisted.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CharacterFlags: u8 {
        const INVISIBLE = 0b0000_0001;
        const PARALYZED = 0b0000_0010;
        const CONFUSED  = 0b0000_0100;
        /// Dead and counting down to respawn; cannot be targeted.
        const RESPAWNING = 0b0000_1000;
    }
}

impl CharacterFlags {
    /// Paralysed characters cannot perform any action.
    pub fn can_act(self) -> bool {
        !self.intersects(Self::PARALYZED | Self::RESPAWNING)
    }

    /// Confused characters cannot cast skills.
    pub fn can_cast(self) -> bool {
        self.can_act() && !self.contains(Self::CONFUSED)
    }
}
