//! Combat resolution.
//!
//! Pure functions: the caller recomputes the attacker's stats, builds the
//! two profiles, resolves, then applies the damage to the target's HP.

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{DefenseModel, HitKind, apply_damage, clamp_pve, effective_defense, roll_damage};
pub use hit::{calculate_hit_chance, check_hit, level_disadvantage};
pub use result::{AttackOutcome, AttackResult, AttackerProfile, DefenderProfile, resolve_attack};
