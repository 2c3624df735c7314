//! Balance constants and tunable parameters.
//!
//! Everything that is a game-balance literal lives here so that operators can
//! override it from a data file. Compile-time sizes used as capacities are
//! associated constants; everything else is a field with a default.

use crate::state::{BuffTypeId, ItemId};

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Maximum quantity a merge may grow an existing stack to.
    pub stack_cap: u32,

    // ===== combat =====
    /// PvE damage floor applied after defense.
    pub pve_min_damage: u32,
    /// NPC defense added per NPC level for physical hits.
    pub npc_physical_defense_per_level: u32,
    /// NPC defense added per NPC level for arts hits.
    pub npc_arts_defense_per_level: u32,
    /// `K` in the PvP transform `def * K / (def + K)`.
    pub pvp_defense_constant: u32,
    /// Level disadvantage above which the accuracy roll is performed at all.
    pub level_gap_threshold: u16,
    pub hit_chance: HitChanceParams,
    /// Damage multiplier for critical hits, in percent.
    pub critical_multiplier_pct: u32,
    /// Damage multiplier for attacks made while invisible, in percent.
    pub invisibility_multiplier_pct: u32,

    // ===== stat pipeline =====
    /// DEX thresholds granting a base critical rate; highest matching band wins.
    pub dex_critical_bands: Vec<CriticalBand>,
    pub attack_speed_cap: u32,
    pub formula: FormulaCoefficients,

    // ===== injury and death =====
    pub max_injury: u32,
    /// Injury thresholds in percent of `max_injury`; highest exceeded band wins.
    pub injury_bands: Vec<InjuryBand>,
    pub injury_per_death: u32,
    /// Injury recovered on every regeneration pulse.
    pub injury_recovery: u32,
    pub player_respawn_secs: u64,
    /// Buff types removed as soon as their owner dies.
    pub death_expired_buffs: Vec<BuffTypeId>,
    /// Quest items dropped on the ground when their carrier dies.
    pub flag_item_ids: Vec<ItemId>,
    /// Server seconds a ground drop lies around before it vanishes.
    pub drop_despawn_secs: u64,

    // ===== periodic work (character ticks) =====
    pub poison_interval: u64,
    pub regen_interval: u64,
    pub save_interval: u64,

    // ===== progression =====
    pub stat_points_per_level: u32,
    pub nature_points_per_level: u32,

    // ===== pets =====
    /// Fullness lost every pet tick.
    pub pet_hunger_per_tick: u8,
    /// Pet HP regenerated every pet tick while fed.
    pub pet_regen_per_tick: u32,
}

impl GameConfig {
    // ===== compile-time constants used as capacities =====
    pub const INVENTORY_SLOTS: usize = 450;
    pub const MAX_UPGRADES: usize = 15;
    pub const MAX_SOCKETS: usize = 15;
    /// Maximum nesting when resolving stones embedded in stones.
    pub const MAX_STONE_DEPTH: usize = 4;
    pub const MAX_PET_FULLNESS: u8 = 100;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_STACK_CAP: u32 = 10_000;
    pub const DEFAULT_PVE_MIN_DAMAGE: u32 = 3;
    pub const DEFAULT_MAX_INJURY: u32 = 1_000;

    pub fn new() -> Self {
        Self {
            stack_cap: Self::DEFAULT_STACK_CAP,
            pve_min_damage: Self::DEFAULT_PVE_MIN_DAMAGE,
            npc_physical_defense_per_level: 6,
            npc_arts_defense_per_level: 4,
            pvp_defense_constant: 2_000,
            level_gap_threshold: 10,
            hit_chance: HitChanceParams::default(),
            critical_multiplier_pct: 150,
            invisibility_multiplier_pct: 130,
            dex_critical_bands: vec![
                CriticalBand::new(0, 1),
                CriticalBand::new(50, 3),
                CriticalBand::new(100, 5),
                CriticalBand::new(200, 8),
                CriticalBand::new(400, 12),
            ],
            attack_speed_cap: 2_500,
            formula: FormulaCoefficients::default(),
            max_injury: Self::DEFAULT_MAX_INJURY,
            injury_bands: vec![
                InjuryBand::new(70, 10),
                InjuryBand::new(80, 20),
                InjuryBand::new(90, 30),
            ],
            injury_per_death: 50,
            injury_recovery: 1,
            player_respawn_secs: 10,
            death_expired_buffs: Vec::new(),
            flag_item_ids: Vec::new(),
            drop_despawn_secs: 180,
            poison_interval: 3,
            regen_interval: 5,
            save_interval: 60,
            stat_points_per_level: 5,
            nature_points_per_level: 1,
            pet_hunger_per_tick: 1,
            pet_regen_per_tick: 5,
        }
    }

    /// Percentage penalty for the given injury, `0` below the first band.
    pub fn injury_penalty_pct(&self, injury: u32) -> u32 {
        if self.max_injury == 0 {
            return 0;
        }
        let scaled = injury.min(self.max_injury) as u64 * 100;
        self.injury_bands
            .iter()
            .filter(|band| scaled > band.threshold_pct as u64 * self.max_injury as u64)
            .map(|band| band.penalty_pct)
            .max()
            .unwrap_or(0)
    }

    /// Base critical rate granted by effective DEX.
    pub fn dex_critical_rate(&self, dex: u32) -> u32 {
        self.dex_critical_bands
            .iter()
            .filter(|band| dex >= band.min_dex)
            .map(|band| band.rate)
            .max()
            .unwrap_or(0)
    }

    pub fn is_death_expired(&self, buff: BuffTypeId) -> bool {
        self.death_expired_buffs.contains(&buff)
    }

    pub fn is_flag_item(&self, item: ItemId) -> bool {
        self.flag_item_ids.contains(&item)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Hit chance bounds, in percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitChanceParams {
    pub base: i32,
    pub min: u32,
    pub max: u32,
}

impl Default for HitChanceParams {
    fn default() -> Self {
        Self {
            base: 85,
            min: 5,
            max: 95,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CriticalBand {
    pub min_dex: u32,
    pub rate: u32,
}

impl CriticalBand {
    pub const fn new(min_dex: u32, rate: u32) -> Self {
        Self { min_dex, rate }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InjuryBand {
    /// Band applies once injury exceeds this percentage of the maximum.
    pub threshold_pct: u32,
    /// Reduction applied to offense, defense and accuracy.
    pub penalty_pct: u32,
}

impl InjuryBand {
    pub const fn new(threshold_pct: u32, penalty_pct: u32) -> Self {
        Self {
            threshold_pct,
            penalty_pct,
        }
    }
}

/// Coefficients of the derived-stat formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormulaCoefficients {
    pub hp_per_str: u32,
    pub chi_per_int: u32,
    pub atk_per_str: u32,
    /// Spread between minimum and maximum physical attack, in percent of minimum.
    pub atk_spread_pct: u32,
    pub arts_per_int: u32,
    /// Divisor of the `INT * physical attack` arts cross-term.
    pub arts_cross_divisor: u32,
    pub defense_per_dex: u32,
    /// Defense granted per point of wind, water and fire combined.
    pub defense_per_elemental: u32,
    pub arts_defense_per_int: u32,
    pub accuracy_per_dex: u32,
    pub dodge_per_dex: u32,
    pub resistance_per_point: u32,
    pub hp_regen_base: u32,
    pub chi_regen_base: u32,
}

impl Default for FormulaCoefficients {
    fn default() -> Self {
        Self {
            hp_per_str: 5,
            chi_per_int: 4,
            atk_per_str: 2,
            atk_spread_pct: 25,
            arts_per_int: 2,
            arts_cross_divisor: 100,
            defense_per_dex: 1,
            defense_per_elemental: 2,
            arts_defense_per_int: 1,
            accuracy_per_dex: 2,
            dodge_per_dex: 1,
            resistance_per_point: 1,
            hp_regen_base: 10,
            chi_regen_base: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injury_penalty_uses_highest_exceeded_band() {
        let config = GameConfig::default();
        assert_eq!(config.injury_penalty_pct(0), 0);
        assert_eq!(config.injury_penalty_pct(700), 0);
        assert_eq!(config.injury_penalty_pct(701), 10);
        assert_eq!(config.injury_penalty_pct(850), 20);
        assert_eq!(config.injury_penalty_pct(1_000), 30);
    }

    #[test]
    fn dex_bands_are_inclusive() {
        let config = GameConfig::default();
        assert_eq!(config.dex_critical_rate(0), 1);
        assert_eq!(config.dex_critical_rate(99), 3);
        assert_eq!(config.dex_critical_rate(100), 5);
        assert_eq!(config.dex_critical_rate(9_999), 12);
    }
}
