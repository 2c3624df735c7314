//! Additive stat grants.
//!
//! A [`StatDelta`] is what items, stones, set bonuses, passives and buffs
//! contribute to a character before the derived formulas run. Every source is
//! summed into one delta, so the type supports `+`, `-` and scaling.

use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};

macro_rules! stat_delta {
    ($(#[$meta:meta])* pub struct $name:ident { $($(#[$field_meta:meta])* $field:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(default))]
        pub struct $name {
            $($(#[$field_meta])* pub $field: i32,)*
        }

        impl $name {
            pub const ZERO: Self = Self { $($field: 0,)* };

            pub fn is_zero(&self) -> bool {
                *self == Self::ZERO
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field = self.$field.saturating_add(rhs.$field);)*
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field = self.$field.saturating_sub(rhs.$field);)*
            }
        }

        impl Mul<i32> for $name {
            type Output = Self;

            fn mul(self, rhs: i32) -> Self {
                Self { $($field: self.$field.saturating_mul(rhs),)* }
            }
        }
    };
}

stat_delta! {
    /// Flat and percentage grants to every aggregated stat.
    pub struct StatDelta {
        str,
        dex,
        int,
        wind,
        water,
        fire,
        max_hp,
        max_chi,
        min_atk,
        max_atk,
        min_arts_atk,
        max_arts_atk,
        defense,
        arts_defense,
        accuracy,
        dodge,
        wind_res,
        water_res,
        fire_res,
        critical_rate,
        reflect_rate,
        absorb_rate,
        attack_speed,
        hp_regen,
        chi_regen,
        exp_rate,
        drop_rate,
        gold_rate,
        /// Percent increase of physical and arts attack.
        atk_pct,
        /// Percent increase of physical and arts defense.
        def_pct,
        /// Percent increase of maximum HP.
        max_hp_pct,
    }
}

impl Add for StatDelta {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sub for StatDelta {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl core::iter::Sum for StatDelta {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl StatDelta {
    /// `base + per_level * level`, the usual shape of a plus-scaled grant.
    pub fn scaled(base: &StatDelta, per_level: &StatDelta, level: u8) -> StatDelta {
        *base + *per_level * i32::from(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_adds_per_level_grant() {
        let base = StatDelta {
            defense: 10,
            ..StatDelta::ZERO
        };
        let per_level = StatDelta {
            defense: 3,
            max_hp: 5,
            ..StatDelta::ZERO
        };
        let scaled = StatDelta::scaled(&base, &per_level, 4);
        assert_eq!(scaled.defense, 22);
        assert_eq!(scaled.max_hp, 20);
    }

    #[test]
    fn sum_then_subtract_returns_to_zero() {
        let a = StatDelta {
            str: 4,
            accuracy: -2,
            ..StatDelta::ZERO
        };
        let b = StatDelta {
            str: 1,
            fire_res: 7,
            ..StatDelta::ZERO
        };
        let total: StatDelta = [a, b].into_iter().sum();
        assert_eq!(total - a - b, StatDelta::ZERO);
        assert!((total - a - b).is_zero());
    }
}
