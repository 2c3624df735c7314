use mmo_core::{Buff, BuffOracle, BuffTypeId, CharacterId, Clock, GrantOutcome};
use tracing::debug;

use crate::World;
use crate::api::{ActionResult, Result};
use crate::events::GameEvent;
use crate::live::LiveCharacter;

impl World {
    /// Grants a buff from a scripted source such as an event or a GM.
    pub fn apply_buff(&self, id: CharacterId, buff: BuffTypeId, plus: u8) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let stats = match self.grant_buff(&live, buff, plus)? {
            Some(GrantOutcome::Created) => live.stats()?.clone(),
            _ => return Ok(ActionResult::success()),
        };
        Ok(ActionResult::success().with_stats(Some(stats)))
    }

    /// Creates or refreshes `buff` on `live`.
    ///
    /// An unknown buff type is a silent no-op and returns `None`.
    pub(crate) fn grant_buff(
        &self,
        live: &LiveCharacter,
        buff: BuffTypeId,
        plus: u8,
    ) -> Result<Option<GrantOutcome>> {
        let Some(definition) = self.oracles.buffs.definition(buff) else {
            debug!(character = %live.id(), ?buff, "unknown buff type, nothing granted");
            return Ok(None);
        };
        let clock = live.clock(self.now());
        let outcome = {
            let mut buffs = live.buffs_mut()?;
            let outcome = buffs.grant(&definition, live.id(), plus, &clock);
            live.set_buff_flags(buffs.flags());
            outcome
        };

        if outcome == GrantOutcome::Created && !definition.delta_at(plus).is_zero() {
            self.refresh_stats(live)?;
        }
        live.mark_dirty();
        self.publish_near(
            live,
            GameEvent::BuffApplied {
                character: live.id(),
                buff,
                refreshed: outcome == GrantOutcome::Refreshed,
            },
        )?;
        Ok(Some(outcome))
    }

    /// Removes every buff due at `clock`, subtracting its grant from the
    /// live stats right away, then rebuilds the stats so nothing the grant
    /// fed into derived formulas survives. Takes the inventory lock.
    pub(crate) fn expire_buffs(&self, live: &LiveCharacter, clock: &dyn Clock) -> Result<Vec<Buff>> {
        let expired = {
            let mut buffs = live.buffs_mut()?;
            let expired = buffs.expire_due(clock);
            if expired.is_empty() {
                return Ok(expired);
            }
            live.set_buff_flags(buffs.flags());

            let mut stats = live.stats_mut()?;
            for buff in expired.iter().filter(|buff| buff.grants_stats()) {
                stats.subtract_delta(&buff.delta);
            }
            live.vitals().clamp(stats.max_hp, stats.max_chi);
            expired
        };

        if expired
            .iter()
            .any(|buff| buff.grants_stats() && !buff.delta.is_zero())
        {
            self.refresh_stats(live)?;
        }
        live.mark_dirty();
        for buff in &expired {
            debug!(character = %live.id(), buff = ?buff.type_id, "buff expired");
            self.publish_near(
                live,
                GameEvent::BuffExpired {
                    character: live.id(),
                    buff: buff.type_id,
                },
            )?;
        }
        Ok(expired)
    }
}
