//! Accuracy against evasion.

use crate::config::GameConfig;
use crate::env::RngOracle;

/// Levels the defender is above the attacker.
pub fn level_disadvantage(attacker_level: u16, defender_level: u16) -> u16 {
    defender_level.saturating_sub(attacker_level)
}

/// Hit chance in percent.
///
/// ```text
/// hit_chance = clamp(base + accuracy - dodge, min, max)
/// ```
pub fn calculate_hit_chance(accuracy: u32, dodge: u32, config: &GameConfig) -> u32 {
    let params = &config.hit_chance;
    let chance = i64::from(params.base) + i64::from(accuracy) - i64::from(dodge);
    let clamped = chance.clamp(i64::from(params.min), i64::from(params.max));
    u32::try_from(clamped).unwrap_or(0)
}

/// Whether an attack connects.
///
/// Only an attacker whose level disadvantage exceeds the configured
/// threshold can miss; everyone else hits without a roll.
pub fn check_hit(
    attacker_level: u16,
    defender_level: u16,
    accuracy: u32,
    dodge: u32,
    rng: &dyn RngOracle,
    config: &GameConfig,
) -> bool {
    if level_disadvantage(attacker_level, defender_level) <= config.level_gap_threshold {
        return true;
    }
    rng.roll_d100() <= calculate_hit_chance(accuracy, dodge, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;

    #[test]
    fn hit_chance_is_clamped() {
        let config = GameConfig::default();
        assert_eq!(calculate_hit_chance(0, 10_000, &config), config.hit_chance.min);
        assert_eq!(calculate_hit_chance(10_000, 0, &config), config.hit_chance.max);
        assert_eq!(calculate_hit_chance(10, 10, &config), 85);
    }

    #[test]
    fn close_levels_never_roll() {
        let config = GameConfig::default();
        let rng = ScriptedRng::new(vec![99]);
        assert!(check_hit(10, 20, 0, 10_000, &rng, &config));
    }

    #[test]
    fn large_gap_can_miss() {
        let config = GameConfig::default();
        let high_roll = ScriptedRng::new(vec![99]);
        assert!(!check_hit(10, 21, 0, 10_000, &high_roll, &config));
        let low_roll = ScriptedRng::new(vec![0]);
        assert!(check_hit(10, 21, 0, 10_000, &low_roll, &config));
    }
}
