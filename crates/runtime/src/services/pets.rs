use std::sync::Arc;

use mmo_core::inventory::PET_SLOT;
use mmo_core::{CharacterId, GameConfig, Rejection};
use tracing::debug;

use crate::World;
use crate::api::{ActionResult, Result};
use crate::events::GameEvent;
use crate::workers::spawn_pet_tick;

impl World {
    /// Summons the pet in the equip pet slot and starts its tick task.
    pub fn summon_pet(self: &Arc<Self>, id: CharacterId) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        if !live.flags().can_act() {
            return Ok(ActionResult::rejected(Rejection::CannotAct));
        }
        {
            let mut inventory = live.inventory(self.inventory_repo())?;
            let Some(pet) = inventory.pet_mut() else {
                return Ok(ActionResult::rejected(Rejection::EmptySlot));
            };
            if pet.summoned {
                return Ok(ActionResult::success());
            }
            if pet.fullness == 0 {
                return Ok(ActionResult::rejected(Rejection::NotUsable));
            }
            pet.summoned = true;
        }
        live.mark_dirty();
        debug!(character = %id, "pet summoned");
        spawn_pet_tick(self, &live)?;
        Ok(ActionResult::success().with_slots([PET_SLOT]))
    }

    /// Sends the pet back. Its tick task stops on its next tick.
    pub fn unsummon_pet(&self, id: CharacterId) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        {
            let mut inventory = live.inventory(self.inventory_repo())?;
            let Some(pet) = inventory.pet_mut() else {
                return Ok(ActionResult::rejected(Rejection::EmptySlot));
            };
            if !pet.summoned {
                return Ok(ActionResult::success());
            }
            pet.summoned = false;
        }
        live.mark_dirty();
        self.publish_owner(id, GameEvent::PetUnsummoned { character: id });
        Ok(ActionResult::success().with_slots([PET_SLOT]))
    }

    /// Raises the pet's fullness by `amount`, capped at the maximum.
    pub fn feed_pet(&self, id: CharacterId, amount: u8) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        {
            let mut inventory = live.inventory(self.inventory_repo())?;
            let Some(pet) = inventory.pet_mut() else {
                return Ok(ActionResult::rejected(Rejection::EmptySlot));
            };
            if pet.fullness == GameConfig::MAX_PET_FULLNESS {
                return Ok(ActionResult::rejected(Rejection::AlreadyFull));
            }
            pet.feed(amount);
        }
        live.mark_dirty();
        Ok(ActionResult::success().with_slots([PET_SLOT]))
    }
}
