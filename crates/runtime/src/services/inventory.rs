use mmo_core::inventory::SlotRange;
use mmo_core::{
    ActionError, CharacterId, Inventory, InventorySlot, ItemClass, Rejection, SlotIndex,
    StorageMode,
};

use super::reject;
use crate::World;
use crate::api::{ActionResult, Result};
use crate::events::GameEvent;
use crate::live::LiveCharacter;

impl World {
    /// Current slot array of an online character.
    pub fn slots(&self, id: CharacterId) -> Result<Vec<InventorySlot>> {
        let live = self.characters.require(id)?;
        let inventory = live.inventory(self.inventory_repo())?;
        Ok(inventory.slots().to_vec())
    }

    /// Opens or closes the bank or box-opener window.
    pub fn open_storage(&self, id: CharacterId, mode: StorageMode) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        live.set_storage(mode)?;
        Ok(ActionResult::success())
    }

    /// Places `stack` in the inventory.
    ///
    /// `requested` targets one empty slot; `None` searches the pack ranges.
    /// Loot always searches.
    pub fn add_item(
        &self,
        id: CharacterId,
        stack: InventorySlot,
        requested: Option<SlotIndex>,
        is_loot: bool,
    ) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let mut inventory = live.inventory(self.inventory_repo())?;
        let context = live.slot_context()?;
        match inventory.add_item(
            stack,
            requested,
            is_loot,
            context,
            self.oracles.items.as_ref(),
            &self.config.game,
        ) {
            Ok(outcome) => {
                self.finish_slot_change(&live, &inventory, outcome.touched, outcome.stats_dirty)
            }
            Err(error) => Ok(reject(error, id, "add_item")),
        }
    }

    pub fn remove_item(&self, id: CharacterId, slot: SlotIndex) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let mut inventory = live.inventory(self.inventory_repo())?;
        match inventory.remove_item(slot) {
            Ok(outcome) => self.finish_slot_change(&live, &inventory, [slot], outcome.stats_dirty),
            Err(rejection) => Ok(reject(rejection.into(), id, "remove_item")),
        }
    }

    pub fn swap_items(&self, id: CharacterId, a: SlotIndex, b: SlotIndex) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let _replace = live.replace_guard()?;
        let mut inventory = live.inventory(self.inventory_repo())?;
        let context = live.slot_context()?;
        match inventory.swap_items(a, b, context, self.oracles.items.as_ref()) {
            Ok(outcome) => {
                self.finish_slot_change(&live, &inventory, outcome.touched, outcome.stats_dirty)
            }
            Err(error) => Ok(reject(error, id, "swap_items")),
        }
    }

    pub fn split_item(
        &self,
        id: CharacterId,
        from: SlotIndex,
        to: SlotIndex,
        quantity: u32,
    ) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let _replace = live.replace_guard()?;
        let mut inventory = live.inventory(self.inventory_repo())?;
        let context = live.slot_context()?;
        match inventory.split_item(from, to, quantity, context, self.oracles.items.as_ref()) {
            Ok(outcome) => {
                self.finish_slot_change(&live, &inventory, outcome.touched, outcome.stats_dirty)
            }
            Err(error) => Ok(reject(error, id, "split_item")),
        }
    }

    pub fn combine_items(&self, id: CharacterId, from: SlotIndex, to: SlotIndex) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let _replace = live.replace_guard()?;
        let mut inventory = live.inventory(self.inventory_repo())?;
        let context = live.slot_context()?;
        match inventory.combine_items(
            from,
            to,
            context,
            self.oracles.items.as_ref(),
            &self.config.game,
        ) {
            Ok(outcome) => {
                self.finish_slot_change(&live, &inventory, outcome.touched, outcome.stats_dirty)
            }
            Err(error) => Ok(reject(error, id, "combine_items")),
        }
    }

    pub fn decrement_item(&self, id: CharacterId, slot: SlotIndex, amount: u32) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let mut inventory = live.inventory(self.inventory_repo())?;
        match inventory.decrement_item(slot, amount) {
            Ok(outcome) => self.finish_slot_change(&live, &inventory, [slot], outcome.stats_dirty),
            Err(rejection) => Ok(reject(rejection.into(), id, "decrement_item")),
        }
    }

    /// Switches a wearable or timed item on or off. Activating a buff item
    /// starts its timer.
    pub fn set_activated(&self, id: CharacterId, slot: SlotIndex, activated: bool) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let mut inventory = live.inventory(self.inventory_repo())?;

        let item = match inventory.slot(slot) {
            None => return Ok(ActionResult::rejected(Rejection::InvalidSlot)),
            Some(entry) if entry.is_empty() => {
                return Ok(ActionResult::rejected(Rejection::EmptySlot));
            }
            Some(entry) => entry.item,
        };
        let definition = match self.env().item(item) {
            Ok(definition) => definition,
            Err(error) => return Ok(reject(ActionError::from(error), id, "set_activated")),
        };
        let Some(entry) = inventory.slot_mut(slot) else {
            return Ok(ActionResult::rejected(Rejection::InvalidSlot));
        };
        if entry.activated == activated {
            return Ok(ActionResult::success());
        }
        entry.activated = activated;
        if activated
            && entry.timer.is_none()
            && let ItemClass::BuffItem { duration_secs } = definition.class
        {
            entry.timer = Some(duration_secs);
        }

        let stats_dirty = SlotRange::of(slot).is_some_and(SlotRange::affects_stats);
        self.finish_slot_change(&live, &inventory, [slot], stats_dirty)
    }

    /// Recompute if needed, then publish. Called with the inventory lock
    /// still held so the order inventory → stats → broadcast holds.
    pub(crate) fn finish_slot_change(
        &self,
        live: &LiveCharacter,
        inventory: &Inventory,
        touched: impl IntoIterator<Item = SlotIndex>,
        stats_dirty: bool,
    ) -> Result<ActionResult> {
        let slots: Vec<SlotIndex> = touched.into_iter().collect();
        let stats = if stats_dirty {
            self.refresh_stats_with(live, inventory)?
        } else {
            None
        };
        live.mark_dirty();

        self.publish_owner(
            live.id(),
            GameEvent::SlotsChanged {
                character: live.id(),
                slots: slots.clone(),
            },
        );
        for &index in &slots {
            let worn = matches!(SlotRange::of(index), Some(SlotRange::Equip | SlotRange::HtArmor));
            if let Some(entry) = inventory.slot(index)
                && worn
            {
                self.publish_near(
                    live,
                    GameEvent::ItemShown {
                        character: live.id(),
                        slot: index,
                        item: entry.item,
                    },
                )?;
            }
        }

        Ok(ActionResult::success().with_slots(slots).with_stats(stats))
    }
}
