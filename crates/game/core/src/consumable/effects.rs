//! Built-in consumable handlers.

use super::{ConsumableEffect, ConsumableTag, ConsumableUse, ConsumeContext, ConsumeOutcome};
use crate::buff::GrantOutcome;
use crate::error::{ActionError, Rejection};

fn missing(current: u32, max: u32) -> u32 {
    max.saturating_sub(current)
}

/// Restores HP by the item magnitude.
#[derive(Clone, Copy, Debug, Default)]
pub struct HealHp;

impl ConsumableEffect for HealHp {
    fn tag(&self) -> ConsumableTag {
        ConsumableTag::HealHp
    }

    fn apply(
        &self,
        item: &ConsumableUse,
        ctx: &mut ConsumeContext<'_>,
    ) -> Result<ConsumeOutcome, ActionError> {
        let room = missing(ctx.vitals.hp, ctx.vitals.max_hp);
        if room == 0 {
            return Err(Rejection::AlreadyFull.into());
        }
        Ok(ConsumeOutcome {
            heal_hp: item.magnitude.min(room),
            ..ConsumeOutcome::default()
        })
    }
}

/// Restores CHI by the item magnitude.
#[derive(Clone, Copy, Debug, Default)]
pub struct RestoreChi;

impl ConsumableEffect for RestoreChi {
    fn tag(&self) -> ConsumableTag {
        ConsumableTag::RestoreChi
    }

    fn apply(
        &self,
        item: &ConsumableUse,
        ctx: &mut ConsumeContext<'_>,
    ) -> Result<ConsumeOutcome, ActionError> {
        let room = missing(ctx.vitals.chi, ctx.vitals.max_chi);
        if room == 0 {
            return Err(Rejection::AlreadyFull.into());
        }
        Ok(ConsumeOutcome {
            restore_chi: item.magnitude.min(room),
            ..ConsumeOutcome::default()
        })
    }
}

/// Restores both HP and CHI. Rejected only when both are full.
#[derive(Clone, Copy, Debug, Default)]
pub struct HealBoth;

impl ConsumableEffect for HealBoth {
    fn tag(&self) -> ConsumableTag {
        ConsumableTag::HealBoth
    }

    fn apply(
        &self,
        item: &ConsumableUse,
        ctx: &mut ConsumeContext<'_>,
    ) -> Result<ConsumeOutcome, ActionError> {
        let hp_room = missing(ctx.vitals.hp, ctx.vitals.max_hp);
        let chi_room = missing(ctx.vitals.chi, ctx.vitals.max_chi);
        if hp_room == 0 && chi_room == 0 {
            return Err(Rejection::AlreadyFull.into());
        }
        Ok(ConsumeOutcome {
            heal_hp: item.magnitude.min(hp_room),
            restore_chi: item.magnitude.min(chi_room),
            ..ConsumeOutcome::default()
        })
    }
}

/// Lowers accumulated injury.
#[derive(Clone, Copy, Debug, Default)]
pub struct CureInjury;

impl ConsumableEffect for CureInjury {
    fn tag(&self) -> ConsumableTag {
        ConsumableTag::CureInjury
    }

    fn apply(
        &self,
        item: &ConsumableUse,
        ctx: &mut ConsumeContext<'_>,
    ) -> Result<ConsumeOutcome, ActionError> {
        if ctx.record.injury == 0 {
            return Err(Rejection::AlreadyFull.into());
        }
        let cured = item.magnitude.min(ctx.record.injury);
        ctx.record.injury -= cured;
        Ok(ConsumeOutcome {
            injury_cured: cured,
            stats_dirty: true,
            ..ConsumeOutcome::default()
        })
    }
}

/// Grants the buff named by the item, scaled by the item's plus level.
///
/// A buff id without a definition grants nothing; the item is still used.
#[derive(Clone, Copy, Debug, Default)]
pub struct GrantBuff;

impl ConsumableEffect for GrantBuff {
    fn tag(&self) -> ConsumableTag {
        ConsumableTag::GrantBuff
    }

    fn apply(
        &self,
        item: &ConsumableUse,
        ctx: &mut ConsumeContext<'_>,
    ) -> Result<ConsumeOutcome, ActionError> {
        grant(item, ctx)
    }
}

/// Opens the expanded bag range by granting an expansion buff.
#[derive(Clone, Copy, Debug, Default)]
pub struct BagExpansion;

impl ConsumableEffect for BagExpansion {
    fn tag(&self) -> ConsumableTag {
        ConsumableTag::BagExpansion
    }

    fn apply(
        &self,
        item: &ConsumableUse,
        ctx: &mut ConsumeContext<'_>,
    ) -> Result<ConsumeOutcome, ActionError> {
        let outcome = grant(item, ctx)?;
        Ok(ConsumeOutcome {
            stats_dirty: false,
            ..outcome
        })
    }
}

fn grant(item: &ConsumableUse, ctx: &mut ConsumeContext<'_>) -> Result<ConsumeOutcome, ActionError> {
    let id = item.buff.ok_or(Rejection::NotUsable)?;
    let Some(definition) = ctx.env.buffs()?.definition(id) else {
        return Ok(ConsumeOutcome::default());
    };
    let granted = ctx.buffs.grant(&definition, ctx.record.id, item.plus, ctx.clock);
    Ok(ConsumeOutcome {
        buff: Some((id, granted)),
        stats_dirty: granted == GrantOutcome::Created && !definition.delta_at(item.plus).is_zero(),
        ..ConsumeOutcome::default()
    })
}
