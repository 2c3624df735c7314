use mmo_core::{DerivedStats, Inventory, StatInputs, recalculate};
use tracing::warn;

use crate::World;
use crate::api::Result;
use crate::events::GameEvent;
use crate::live::LiveCharacter;

impl World {
    /// Rebuilds `live`'s derived stats. Takes the inventory lock.
    ///
    /// Returns `None` when a lookup failed; the previous stats stay in place.
    pub fn refresh_stats(&self, live: &LiveCharacter) -> Result<Option<DerivedStats>> {
        let inventory = live.inventory(self.inventory_repo())?;
        self.refresh_stats_with(live, &inventory)
    }

    /// Same as [`refresh_stats`](Self::refresh_stats) for a caller already
    /// holding the inventory lock.
    pub(crate) fn refresh_stats_with(
        &self,
        live: &LiveCharacter,
        inventory: &Inventory,
    ) -> Result<Option<DerivedStats>> {
        let computed = {
            let record = live.record()?;
            let base = live.base()?;
            let buffs = live.buffs()?;
            let inputs = StatInputs {
                record: &record,
                base: &base,
                inventory,
                buffs: &buffs,
            };
            recalculate(&inputs, &self.env(), &self.config.game)
        };
        let stats = match computed {
            Ok(stats) => stats,
            Err(error) => {
                warn!(character = %live.id(), %error, "stat recalculation aborted");
                return Ok(None);
            }
        };

        let maxima_changed = {
            let mut current = live.stats_mut()?;
            let changed = current.max_hp != stats.max_hp || current.max_chi != stats.max_chi;
            *current = stats.clone();
            changed
        };
        live.vitals().clamp(stats.max_hp, stats.max_chi);
        live.mark_dirty();

        if maxima_changed {
            self.publish_owner(
                live.id(),
                GameEvent::StatsChanged {
                    character: live.id(),
                    max_hp: stats.max_hp,
                    max_chi: stats.max_chi,
                },
            );
        }
        Ok(Some(stats))
    }
}
