use crate::state::{BuffTypeId, SkillId};
use crate::stats::StatDelta;

/// Read-only skill book.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, id: SkillId) -> Option<SkillDefinition>;

    /// Job passive unlocked through the skill book, if `id` names one.
    fn passive(&self, id: SkillId) -> Option<PassiveDefinition>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub chi_cost: u32,
    pub kind: SkillKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillKind {
    /// Grants `buff` to the target, scaled by the caster's plus level.
    Buff { buff: BuffTypeId },
    /// Arts attack.
    Attack {
        /// Damage multiplier in percent (100 = plain hit).
        multiplier_pct: u32,
        /// Status buff inflicted on a successful hit.
        inflicts: Option<BuffTypeId>,
        /// Chance in percent that `inflicts` lands.
        chance_pct: u32,
    },
}

/// Passive bonus granted per learned level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveDefinition {
    pub id: SkillId,
    pub per_level: StatDelta,
}

impl PassiveDefinition {
    pub fn delta_at(&self, level: u8) -> StatDelta {
        self.per_level * i32::from(level)
    }
}
