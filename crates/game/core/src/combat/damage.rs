//! Damage calculation and application.

use crate::config::GameConfig;
use crate::env::RngOracle;

/// Which attack and defense pair a hit uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitKind {
    #[default]
    Physical,
    Arts,
}

/// Opponent-specific defense model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefenseModel {
    /// Template defense plus `level × per-hit-type constant`.
    Npc { level: u16 },
    /// Diminishing returns: `def × K / (def + K)`.
    Player,
}

/// Defense actually subtracted from a raw roll.
pub fn effective_defense(model: DefenseModel, defense: u32, kind: HitKind, config: &GameConfig) -> u32 {
    match model {
        DefenseModel::Npc { level } => {
            let per_level = match kind {
                HitKind::Physical => config.npc_physical_defense_per_level,
                HitKind::Arts => config.npc_arts_defense_per_level,
            };
            defense.saturating_add(u32::from(level).saturating_mul(per_level))
        }
        DefenseModel::Player => {
            let constant = u64::from(config.pvp_defense_constant);
            let defense = u64::from(defense);
            let denominator = defense + constant;
            if denominator == 0 {
                return 0;
            }
            u32::try_from(defense * constant / denominator).unwrap_or(u32::MAX)
        }
    }
}

/// Rolls uniformly in `[min, max]`, scales by `multiplier_pct` and subtracts
/// the effective defense.
pub fn roll_damage(
    range: (u32, u32),
    multiplier_pct: u32,
    defense: u32,
    rng: &dyn RngOracle,
) -> u32 {
    let (min, max) = range;
    let rolled = u64::from(rng.range(min, max.max(min)));
    let scaled = rolled * u64::from(multiplier_pct) / 100;
    u32::try_from(scaled)
        .unwrap_or(u32::MAX)
        .saturating_sub(defense)
}

/// Applies a percentage multiplier.
pub fn scale(damage: u32, percent: u32) -> u32 {
    u32::try_from(u64::from(damage) * u64::from(percent) / 100).unwrap_or(u32::MAX)
}

/// PvE floor: at least the configured minimum, never more than the HP left.
pub fn clamp_pve(damage: u32, target_hp: u32, config: &GameConfig) -> u32 {
    damage.max(config.pve_min_damage).min(target_hp)
}

/// Apply damage to current HP, saturating at zero.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;

    #[test]
    fn npc_defense_scales_with_level_and_hit_kind() {
        let config = GameConfig::default();
        let model = DefenseModel::Npc { level: 10 };
        assert_eq!(effective_defense(model, 5, HitKind::Physical, &config), 5 + 60);
        assert_eq!(effective_defense(model, 5, HitKind::Arts, &config), 5 + 40);
    }

    #[test]
    fn player_defense_has_diminishing_returns() {
        let config = GameConfig::default();
        let low = effective_defense(DefenseModel::Player, 2_000, HitKind::Physical, &config);
        let high = effective_defense(DefenseModel::Player, 20_000, HitKind::Physical, &config);
        assert_eq!(low, 1_000);
        assert!(high < config.pvp_defense_constant);
        assert!(high > low);
    }

    #[test]
    fn pve_floor_and_hp_cap() {
        let config = GameConfig::default();
        assert_eq!(clamp_pve(0, 100, &config), 3);
        assert_eq!(clamp_pve(999, 10, &config), 10);
        assert_eq!(clamp_pve(0, 2, &config), 2);
    }

    #[test]
    fn roll_subtracts_defense_without_underflow() {
        let rng = ScriptedRng::new(vec![0]);
        assert_eq!(roll_damage((50, 50), 100, 80, &rng), 0);
        assert_eq!(roll_damage((50, 50), 200, 80, &rng), 20);
    }

    #[test]
    fn apply_damage_never_goes_negative() {
        assert_eq!(apply_damage(10, 999), 0);
        assert_eq!(apply_damage(10, 3), 7);
    }
}
