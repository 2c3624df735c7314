//! Attack resolution.

use crate::config::GameConfig;
use crate::env::{NpcTemplate, RngOracle};
use crate::stats::DerivedStats;

use super::damage::{DefenseModel, HitKind, clamp_pve, effective_defense, roll_damage, scale};
use super::hit::check_hit;

/// Outcome of an attack attempt. Selects the broadcast variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    Miss,
    Hit,
    Critical,
    /// Hit from invisibility. Takes precedence over `Critical`.
    Ambush,
}

/// Result of a combat resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub outcome: AttackOutcome,
    /// Damage to apply to the target. Zero on a miss.
    pub damage: u32,
    /// Damage bounced back onto the attacker.
    pub reflected: u32,
    /// HP the attacker heals from the hit.
    pub absorbed: u32,
}

impl AttackResult {
    pub const MISS: Self = Self {
        outcome: AttackOutcome::Miss,
        damage: 0,
        reflected: 0,
        absorbed: 0,
    };

    pub fn is_hit(&self) -> bool {
        self.outcome != AttackOutcome::Miss
    }
}

/// Attacker side of a hit, read from freshly recomputed stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackerProfile {
    pub level: u16,
    pub kind: HitKind,
    pub range: (u32, u32),
    pub accuracy: u32,
    pub critical_rate: u32,
    pub absorb_rate: u32,
    pub invisible: bool,
    /// Skill multiplier in percent, 100 for a plain attack.
    pub multiplier_pct: u32,
}

impl AttackerProfile {
    pub fn from_stats(level: u16, stats: &DerivedStats, kind: HitKind) -> Self {
        Self {
            level,
            kind,
            range: stats.attack_range(kind == HitKind::Arts),
            accuracy: stats.accuracy,
            critical_rate: stats.critical_rate,
            absorb_rate: stats.absorb_rate,
            invisible: false,
            multiplier_pct: 100,
        }
    }

    #[must_use]
    pub fn invisible(mut self, invisible: bool) -> Self {
        self.invisible = invisible;
        self
    }

    #[must_use]
    pub fn with_multiplier(mut self, multiplier_pct: u32) -> Self {
        self.multiplier_pct = multiplier_pct;
        self
    }
}

/// Defender side of a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenderProfile {
    pub level: u16,
    pub model: DefenseModel,
    pub defense: u32,
    pub dodge: u32,
    pub reflect_rate: u32,
    pub hp: u32,
}

impl DefenderProfile {
    pub fn npc(template: &NpcTemplate, hp: u32) -> Self {
        Self {
            level: template.level,
            model: DefenseModel::Npc {
                level: template.level,
            },
            defense: template.defense,
            dodge: template.dodge,
            reflect_rate: 0,
            hp,
        }
    }

    pub fn player(level: u16, stats: &DerivedStats, kind: HitKind, hp: u32) -> Self {
        Self {
            level,
            model: DefenseModel::Player,
            defense: match kind {
                HitKind::Physical => stats.defense,
                HitKind::Arts => stats.arts_defense,
            },
            dodge: stats.dodge,
            reflect_rate: stats.reflect_rate,
            hp,
        }
    }

    pub fn is_npc(&self) -> bool {
        matches!(self.model, DefenseModel::Npc { .. })
    }
}

/// Resolves one attack: hit check, damage roll, critical and invisibility
/// multipliers, PvE floor.
///
/// Rolls are taken in a fixed order (hit, damage, critical) so a scripted
/// generator reproduces a fight exactly.
pub fn resolve_attack(
    attacker: &AttackerProfile,
    defender: &DefenderProfile,
    rng: &dyn RngOracle,
    config: &GameConfig,
) -> AttackResult {
    if !check_hit(
        attacker.level,
        defender.level,
        attacker.accuracy,
        defender.dodge,
        rng,
        config,
    ) {
        return AttackResult::MISS;
    }

    let defense = effective_defense(defender.model, defender.defense, attacker.kind, config);
    let mut damage = roll_damage(attacker.range, attacker.multiplier_pct, defense, rng);

    let mut outcome = AttackOutcome::Hit;
    if rng.chance(attacker.critical_rate) {
        damage = scale(damage, config.critical_multiplier_pct);
        outcome = AttackOutcome::Critical;
    }
    if attacker.invisible {
        damage = scale(damage, config.invisibility_multiplier_pct);
        outcome = AttackOutcome::Ambush;
    }

    if defender.is_npc() {
        damage = clamp_pve(damage, defender.hp, config);
    }

    AttackResult {
        outcome,
        damage,
        reflected: scale(damage, defender.reflect_rate),
        absorbed: scale(damage, attacker.absorb_rate),
    }
}
