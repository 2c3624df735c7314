use mmo_core::{CharacterId, DerivedStats, gain_exp};
use tracing::info;

use crate::World;
use crate::api::{ActionResult, Result};
use crate::events::GameEvent;
use crate::live::LiveCharacter;

impl World {
    /// Grants experience from a quest or script.
    pub fn grant_exp(&self, id: CharacterId, amount: u64) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let stats = self.award_exp(&live, amount)?;
        Ok(ActionResult::success().with_stats(stats))
    }

    /// Adds experience and handles any level ups. Returns the new stats when
    /// a level was gained.
    pub(crate) fn award_exp(
        &self,
        live: &LiveCharacter,
        amount: u64,
    ) -> Result<Option<DerivedStats>> {
        if amount == 0 {
            return Ok(None);
        }
        let (gained, level) = {
            let mut record = live.record_mut()?;
            let mut base = live.base_mut()?;
            let gained = gain_exp(
                &mut record,
                &mut base,
                amount,
                self.oracles.tables.as_ref(),
                &self.config.game,
            );
            (gained, record.level)
        };
        live.mark_dirty();
        self.publish_owner(
            live.id(),
            GameEvent::ExpGained {
                character: live.id(),
                amount,
            },
        );
        if !gained.any() {
            return Ok(None);
        }

        info!(character = %live.id(), level, levels = gained.levels, "level up");
        let stats = self.refresh_stats(live)?;
        if let Some(stats) = &stats {
            live.vitals().refill(stats.max_hp, stats.max_chi);
        }
        self.publish_near(
            live,
            GameEvent::LevelUp {
                character: live.id(),
                level,
            },
        )?;
        self.publish_vitals(live)?;
        Ok(stats)
    }
}
