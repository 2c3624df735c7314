//! Derived combat statistics.
//!
//! Never persisted. Always produced by a full pipeline run; the only
//! incremental change allowed is [`DerivedStats::subtract_delta`] when a buff
//! expires between two runs.

use super::delta::StatDelta;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedStats {
    // effective primaries
    pub str: u32,
    pub dex: u32,
    pub int: u32,
    pub wind: u32,
    pub water: u32,
    pub fire: u32,

    pub max_hp: u32,
    pub max_chi: u32,
    pub min_atk: u32,
    pub max_atk: u32,
    pub min_arts_atk: u32,
    pub max_arts_atk: u32,
    pub defense: u32,
    pub arts_defense: u32,
    pub accuracy: u32,
    pub dodge: u32,
    pub wind_res: u32,
    pub water_res: u32,
    pub fire_res: u32,

    /// Percent.
    pub critical_rate: u32,
    /// Percent of received damage reflected to the attacker.
    pub reflect_rate: u32,
    /// Percent of dealt damage healed back.
    pub absorb_rate: u32,
    pub attack_speed: u32,
    pub hp_regen: u32,
    pub chi_regen: u32,

    /// Percent multipliers, 100 = neutral.
    pub exp_rate: u32,
    pub drop_rate: u32,
    pub gold_rate: u32,

    /// Injury penalty in force when these stats were computed.
    pub injury_penalty_pct: u32,
}

macro_rules! subtract_fields {
    ($stats:ident, $delta:ident, [$($field:ident),* $(,)?]) => {
        $(
            $stats.$field = u32::try_from(i64::from($stats.$field) - i64::from($delta.$field))
                .unwrap_or(0);
        )*
    };
}

impl DerivedStats {
    /// Removes a flat grant immediately, saturating at zero.
    ///
    /// Percentage fields of the delta are not reversible here and are left
    /// for the next full recalculation.
    pub fn subtract_delta(&mut self, delta: &StatDelta) {
        let stats = self;
        subtract_fields!(stats, delta, [
            str, dex, int, wind, water, fire,
            max_hp, max_chi,
            min_atk, max_atk, min_arts_atk, max_arts_atk,
            defense, arts_defense, accuracy, dodge,
            wind_res, water_res, fire_res,
            critical_rate, reflect_rate, absorb_rate, attack_speed,
            hp_regen, chi_regen, exp_rate, drop_rate, gold_rate,
        ]);
        stats.max_hp = stats.max_hp.max(1);
    }

    /// Uniform roll range for the given hit kind.
    pub fn attack_range(&self, arts: bool) -> (u32, u32) {
        if arts {
            (self.min_arts_atk, self.max_arts_atk.max(self.min_arts_atk))
        } else {
            (self.min_atk, self.max_atk.max(self.min_atk))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtract_saturates_at_zero() {
        let mut stats = DerivedStats {
            defense: 30,
            max_hp: 100,
            ..DerivedStats::default()
        };
        stats.subtract_delta(&StatDelta {
            defense: 45,
            max_hp: -20,
            ..StatDelta::ZERO
        });
        assert_eq!(stats.defense, 0);
        assert_eq!(stats.max_hp, 120);
    }
}
