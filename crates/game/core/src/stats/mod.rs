//! Character statistics.
//!
//! Base attributes are persisted in a [`StatRecord`]. Everything a fight
//! reads lives in [`DerivedStats`], which only [`recalculate`] produces.
//! Contributions from buffs, passives and items are summed as [`StatDelta`]
//! values before the formulas run.

pub mod bonus;

mod base;
mod delta;
mod derived;
mod equipment;
mod pipeline;

pub use base::StatRecord;
pub use bonus::{Bonus, BonusStack, StatBounds};
pub use delta::StatDelta;
pub use derived::DerivedStats;
pub use equipment::{equipment_delta, item_delta};
pub use pipeline::{StatInputs, passive_delta, recalculate};
