//! Bonus application following the layered stack:
//! Flat → %Inc → Less → Clamp.
//!
//! The pipeline uses it for every percentage that touches a derived stat
//! (attack/defense/HP increases, injury penalty), so the order is the same
//! for all of them.

/// A single bonus that can be applied to a stat value.
///
/// - **Flat**: additive, applied first
/// - **Increased**: percentage increases, summed then multiplied
/// - **Less**: sequential reductions (10 = ×0.9)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Bonus {
    Flat(i32),
    Increased(i32),
    Less(i32),
}

/// A collection of bonuses applied in stack order.
///
/// # Example
/// ```
/// # use mmo_core::stats::bonus::{Bonus, BonusStack};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::Flat(5));
/// stack.add(Bonus::Increased(20));
/// stack.add(Bonus::Increased(15));
/// stack.add(Bonus::Less(10));
///
/// // clamp((10 + 5) × 1.35 × 0.9, 5, 100) = 18
/// assert_eq!(stack.apply(10, 5, 100), 18);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            bonuses: Vec::new(),
        }
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    /// Applies all bonuses to `base` and clamps the result.
    ///
    /// ```text
    /// result = clamp((base + flat) × (1 + inc/100) × Π less, min, max)
    /// ```
    ///
    /// Intermediate values are computed in 64 bits.
    pub fn apply(&self, base: i64, min: i64, max: i64) -> i64 {
        let flat_sum: i64 = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Flat(v) => Some(i64::from(*v)),
                _ => None,
            })
            .sum();

        let inc_sum: i64 = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Increased(p) => Some(i64::from(*p)),
                _ => None,
            })
            .sum();

        let after_inc = if inc_sum == 0 {
            base + flat_sum
        } else {
            ((base + flat_sum) * (100 + inc_sum)) / 100
        };

        let after_less = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Less(p) => Some(i64::from(*p)),
                _ => None,
            })
            .fold(after_inc, |acc, less| (acc * (100 - less)) / 100);

        after_less.clamp(min, max)
    }

    /// Applies the stack and clamps into `bounds`, returning an unsigned value.
    pub fn apply_bounded(&self, base: i64, bounds: StatBounds) -> u32 {
        let value = self.apply(base, i64::from(bounds.min), i64::from(bounds.max));
        u32::try_from(value).unwrap_or(0)
    }
}

/// Builder-style helpers.
impl BonusStack {
    pub fn flat(mut self, value: i32) -> Self {
        self.add(Bonus::Flat(value));
        self
    }

    pub fn increased(mut self, percent: i32) -> Self {
        self.add(Bonus::Increased(percent));
        self
    }

    pub fn less(mut self, percent: i32) -> Self {
        self.add(Bonus::Less(percent));
        self
    }
}

/// Clamp bounds of a derived stat family.
#[derive(Clone, Copy, Debug)]
pub struct StatBounds {
    pub min: u32,
    pub max: u32,
}

impl StatBounds {
    /// HP, CHI, attack, defense, accuracy and the like.
    pub const DERIVED: Self = Self {
        min: 0,
        max: 10_000_000,
    };

    /// Percentage chances (critical, reflect, absorb).
    pub const CHANCE: Self = Self { min: 0, max: 100 };

    /// Resource maxima never drop to zero.
    pub const RESOURCE: Self = Self {
        min: 1,
        max: 10_000_000,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn less_applies_after_increased() {
        let value = BonusStack::new().increased(50).less(10).apply(100, 0, 1_000);
        assert_eq!(value, 135);
    }

    #[test]
    fn flat_lands_before_percentages() {
        let value = BonusStack::new().increased(20).flat(5).less(10).apply(10, 0, 100);
        assert_eq!(value, 16);
    }

    #[test]
    fn bounded_apply_never_goes_negative() {
        let value = BonusStack::new().flat(-50).apply_bounded(10, StatBounds::DERIVED);
        assert_eq!(value, 0);
        let resource = BonusStack::new().apply_bounded(0, StatBounds::RESOURCE);
        assert_eq!(resource, 1);
    }
}
