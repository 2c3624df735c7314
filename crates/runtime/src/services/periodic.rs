//! Work driven by the per-character tick, the pet tick and the visibility
//! refresh.

use std::collections::HashSet;
use std::sync::Arc;

use mmo_core::inventory::{PET_SLOT, PetTick};
use mmo_core::{CharacterId, Clock};
use tracing::{debug, trace};

use crate::World;
use crate::api::Result;
use crate::events::GameEvent;
use crate::live::LiveCharacter;

impl World {
    /// One tick of a character: buff expiry, poison, item timers,
    /// regeneration and write-behind saves.
    ///
    /// Returns false once the character is gone, which stops its task.
    pub fn tick_character(self: &Arc<Self>, id: CharacterId) -> Result<bool> {
        let Some(live) = self.characters.get(id)? else {
            return Ok(false);
        };
        if !live.is_online() {
            return Ok(false);
        }

        let tick = live.advance_tick();
        let clock = live.clock(self.now());
        self.expire_buffs(&live, &clock)?;
        if live.is_alive()? {
            self.apply_poison(&live, &clock)?;
        }
        self.tick_item_timers(&live)?;

        let game = &self.config.game;
        if game.regen_interval > 0 && tick.0 % game.regen_interval == 0 && live.is_alive()? {
            self.regenerate(&live)?;
        }

        let deferred = self.dirty.take(id)?;
        let periodic = game.save_interval > 0 && tick.0 % game.save_interval == 0 && live.take_dirty();
        if deferred || periodic {
            trace!(character = %id, %tick, deferred, "scheduling save");
            self.schedule_save(&live)?;
        }
        Ok(true)
    }

    fn apply_poison(self: &Arc<Self>, live: &Arc<LiveCharacter>, clock: &dyn Clock) -> Result<()> {
        let damage = live
            .buffs()?
            .poison_due(clock, self.config.game.poison_interval);
        if damage == 0 {
            return Ok(());
        }
        let applied = live.vitals().damage(damage);
        debug!(character = %live.id(), damage = applied.dealt, "poison tick");
        self.publish_vitals(live)?;
        if applied.lethal {
            self.player_death(live, None)?;
        }
        Ok(())
    }

    fn tick_item_timers(&self, live: &LiveCharacter) -> Result<()> {
        let mut inventory = live.inventory(self.inventory_repo())?;
        let expired = inventory.tick_timers();
        if expired.is_empty() {
            return Ok(());
        }
        for item in &expired {
            debug!(character = %live.id(), slot = item.slot, item = ?item.item, "timed item expired");
        }
        let stats_dirty = expired.iter().any(|item| item.stats_dirty);
        let slots: Vec<_> = expired.iter().map(|item| item.slot).collect();
        self.finish_slot_change(live, &inventory, slots, stats_dirty)?;
        Ok(())
    }

    /// HP/CHI regeneration and injury recovery.
    fn regenerate(&self, live: &LiveCharacter) -> Result<()> {
        let (hp_regen, chi_regen, max_hp, max_chi) = {
            let stats = live.stats()?;
            (stats.hp_regen, stats.chi_regen, stats.max_hp, stats.max_chi)
        };
        let healed = live.vitals().heal(hp_regen, max_hp);
        let restored = live.vitals().restore_chi(chi_regen, max_chi);

        let band_changed = {
            let mut record = live.record_mut()?;
            if record.injury == 0 {
                false
            } else {
                let game = &self.config.game;
                let before = game.injury_penalty_pct(record.injury);
                record.injury = record.injury.saturating_sub(game.injury_recovery);
                before != game.injury_penalty_pct(record.injury)
            }
        };
        if band_changed {
            self.refresh_stats(live)?;
        }
        if healed > 0 || restored > 0 {
            live.mark_dirty();
            self.publish_vitals(live)?;
        }
        Ok(())
    }

    /// One tick of a character's pet. Returns false when the pet task
    /// should stop.
    pub fn tick_pet(&self, id: CharacterId) -> Result<bool> {
        let Some(live) = self.characters.get(id)? else {
            return Ok(false);
        };
        if !live.is_online() {
            return Ok(false);
        }
        let mut inventory = live.inventory(self.inventory_repo())?;
        let tick = match inventory.pet_mut() {
            Some(pet) => pet.tick(&self.config.game),
            None => PetTick::Idle,
        };
        match tick {
            PetTick::Idle => Ok(false),
            PetTick::Fed { .. } => {
                live.mark_dirty();
                Ok(true)
            }
            PetTick::Starved => {
                debug!(character = %id, "pet starved and was unsummoned");
                self.finish_slot_change(&live, &inventory, [PET_SLOT], false)?;
                drop(inventory);
                self.publish_owner(id, GameEvent::PetUnsummoned { character: id });
                Ok(false)
            }
        }
    }

    /// Clears expired ground drops, then rebuilds every online character's
    /// sight sets.
    pub fn refresh_visibility(&self) -> Result<()> {
        self.despawn_drops()?;
        let radius = self.config.visibility_radius;
        let characters = self.characters.all()?;
        let mut positions = Vec::with_capacity(characters.len());
        for live in &characters {
            positions.push((live.id(), live.record()?.position));
        }

        for (live, (id, position)) in characters.iter().zip(&positions) {
            let players: HashSet<CharacterId> = positions
                .iter()
                .filter(|(other, at)| other != id && at.within(position, radius))
                .map(|(other, _)| *other)
                .collect();
            let npcs = self
                .npcs
                .near(position, radius)?
                .iter()
                .map(|npc| npc.id())
                .collect();
            let drops = self.drops.near(position, radius)?.into_iter().collect();
            live.sight().replace(players, npcs, drops)?;
        }
        Ok(())
    }

    /// Removes every ground drop past its deadline. Returns how many went.
    pub fn despawn_drops(&self) -> Result<usize> {
        let expired = self.drops.take_expired(self.now())?;
        for drop in &expired {
            trace!(drop = ?drop.id, item = ?drop.slot.item, "ground drop despawned");
            self.publish_at(&drop.position, GameEvent::DropRemoved { drop: drop.id })?;
        }
        Ok(expired.len())
    }
}
