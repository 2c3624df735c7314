use crate::state::JobClass;

/// Oracle providing class and progression tables.
///
/// Entity data lives in the item, skill and NPC oracles; this one only holds
/// per-class constants and the experience curve.
pub trait TablesOracle: Send + Sync {
    fn class_base(&self, class: JobClass) -> Option<ClassBase>;

    /// Experience needed to advance from `level` to `level + 1`.
    /// `None` at the level cap.
    fn exp_to_next(&self, level: u16) -> Option<u64>;
}

/// Class constants feeding the first step of the stat pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassBase {
    pub base_hp: u32,
    pub hp_per_level: u32,
    pub base_chi: u32,
    pub chi_per_level: u32,
    pub base_attack_speed: u32,
}

impl ClassBase {
    pub const fn new(
        base_hp: u32,
        hp_per_level: u32,
        base_chi: u32,
        chi_per_level: u32,
        base_attack_speed: u32,
    ) -> Self {
        Self {
            base_hp,
            hp_per_level,
            base_chi,
            chi_per_level,
            base_attack_speed,
        }
    }

    pub fn max_hp_at(&self, level: u16) -> u32 {
        self.base_hp + self.hp_per_level * u32::from(level.saturating_sub(1))
    }

    pub fn max_chi_at(&self, level: u16) -> u32 {
        self.base_chi + self.chi_per_level * u32::from(level.saturating_sub(1))
    }
}
