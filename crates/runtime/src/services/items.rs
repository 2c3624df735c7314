use mmo_core::consumable::Vitals as VitalsView;
use mmo_core::{
    ActionError, CharacterId, ConsumeContext, GrantOutcome, InventorySlot, ItemId, Rejection,
    SlotIndex, use_item,
};
use tracing::debug;

use super::reject;
use crate::World;
use crate::api::{ActionResult, Result};
use crate::events::GameEvent;
use crate::live::LiveCharacter;

impl World {
    /// Uses one unit of the consumable in `slot`.
    pub fn use_item(&self, id: CharacterId, slot: SlotIndex) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        if !live.flags().can_act() {
            return Ok(ActionResult::rejected(Rejection::CannotAct));
        }

        let mut inventory = live.inventory(self.inventory_repo())?;
        let (max_hp, max_chi) = {
            let stats = live.stats()?;
            (stats.max_hp, stats.max_chi)
        };
        let clock = live.clock(self.now());

        let used = {
            let mut record = live.record_mut()?;
            let mut buffs = live.buffs_mut()?;
            let mut ctx = ConsumeContext {
                record: &mut record,
                buffs: &mut buffs,
                vitals: VitalsView {
                    hp: live.vitals().hp(),
                    max_hp,
                    chi: live.vitals().chi(),
                    max_chi,
                },
                env: self.env(),
                clock: &clock,
                config: &self.config.game,
            };
            let used = use_item(&mut inventory, slot, &self.consumables, &mut ctx);
            if used.is_ok() {
                live.set_buff_flags(buffs.flags());
            }
            used
        };
        let used = match used {
            Ok(used) => used,
            Err(error) => return Ok(reject(error, id, "use_item")),
        };
        debug!(character = %id, item = ?used.item, tag = %used.tag, "item used");

        let effect = used.effect;
        let healed = live.vitals().heal(effect.heal_hp, max_hp);
        let restored = live.vitals().restore_chi(effect.restore_chi, max_chi);

        let result = self.finish_slot_change(&live, &inventory, [slot], used.stats_dirty)?;
        drop(inventory);

        if let Some((buff, outcome)) = effect.buff {
            self.publish_near(
                &live,
                GameEvent::BuffApplied {
                    character: id,
                    buff,
                    refreshed: outcome == GrantOutcome::Refreshed,
                },
            )?;
        }
        if healed > 0 || restored > 0 {
            self.publish_vitals(&live)?;
        }
        Ok(result)
    }

    pub fn gold(&self, id: CharacterId) -> Result<u64> {
        let live = self.characters.require(id)?;
        Ok(*live.gold()?)
    }

    pub fn add_gold(&self, id: CharacterId, amount: u64) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let total = {
            let mut gold = live.gold()?;
            let Some(total) = gold.checked_add(amount) else {
                return Ok(ActionResult::rejected(Rejection::GoldOverflow));
            };
            *gold = total;
            total
        };
        self.gold_changed(&live, total);
        Ok(ActionResult::success())
    }

    pub fn spend_gold(&self, id: CharacterId, amount: u64) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let total = {
            let mut gold = live.gold()?;
            let Some(total) = gold.checked_sub(amount) else {
                return Ok(ActionResult::rejected(Rejection::InsufficientGold));
            };
            *gold = total;
            total
        };
        self.gold_changed(&live, total);
        Ok(ActionResult::success())
    }

    /// Buys `quantity` of `item` at its shop price.
    ///
    /// The placement is validated before any gold moves, so a full bag costs
    /// nothing.
    pub fn buy_item(&self, id: CharacterId, item: ItemId, quantity: u32) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let definition = match self.env().item(item) {
            Ok(definition) => definition,
            Err(error) => return Ok(reject(ActionError::from(error), id, "buy_item")),
        };
        if quantity == 0 {
            return Ok(ActionResult::rejected(Rejection::InsufficientQuantity));
        }
        if !definition.stackable && quantity > 1 {
            return Ok(ActionResult::rejected(Rejection::NotStackable));
        }
        let Some(cost) = definition.price.checked_mul(u64::from(quantity)) else {
            return Ok(ActionResult::rejected(Rejection::InsufficientGold));
        };

        let _replace = live.replace_guard()?;
        let mut inventory = live.inventory(self.inventory_repo())?;
        let mut gold = live.gold()?;
        if *gold < cost {
            return Ok(ActionResult::rejected(Rejection::InsufficientGold));
        }
        let context = live.slot_context()?;
        let outcome = match inventory.add_item(
            InventorySlot::new(item, quantity),
            None,
            false,
            context,
            self.oracles.items.as_ref(),
            &self.config.game,
        ) {
            Ok(outcome) => outcome,
            Err(error) => return Ok(reject(error, id, "buy_item")),
        };
        *gold -= cost;
        let total = *gold;
        drop(gold);

        debug!(character = %id, ?item, quantity, cost, "item bought");
        let result =
            self.finish_slot_change(&live, &inventory, outcome.touched, outcome.stats_dirty)?;
        self.gold_changed(&live, total);
        Ok(result)
    }

    /// Sells the whole stack in `slot` for half its shop price per unit.
    pub fn sell_item(&self, id: CharacterId, slot: SlotIndex) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        let _replace = live.replace_guard()?;
        let mut inventory = live.inventory(self.inventory_repo())?;

        let (item, quantity) = match inventory.slot(slot) {
            None => return Ok(ActionResult::rejected(Rejection::InvalidSlot)),
            Some(entry) if entry.is_empty() => {
                return Ok(ActionResult::rejected(Rejection::EmptySlot));
            }
            Some(entry) => (entry.item, entry.quantity),
        };
        let definition = match self.env().item(item) {
            Ok(definition) => definition,
            Err(error) => return Ok(reject(ActionError::from(error), id, "sell_item")),
        };
        if !definition.tradable || definition.sell_price() == 0 {
            return Ok(ActionResult::rejected(Rejection::NotSellable));
        }
        let credit = definition.sell_price().saturating_mul(u64::from(quantity));

        let mut gold = live.gold()?;
        let Some(total) = gold.checked_add(credit) else {
            return Ok(ActionResult::rejected(Rejection::GoldOverflow));
        };
        let removed = match inventory.remove_item(slot) {
            Ok(removed) => removed,
            Err(rejection) => return Ok(reject(rejection.into(), id, "sell_item")),
        };
        *gold = total;
        drop(gold);

        debug!(character = %id, ?item, quantity, credit, "item sold");
        let result = self.finish_slot_change(&live, &inventory, [slot], removed.stats_dirty)?;
        self.gold_changed(&live, total);
        Ok(result)
    }

    fn gold_changed(&self, live: &LiveCharacter, gold: u64) {
        live.mark_dirty();
        self.publish_owner(
            live.id(),
            GameEvent::GoldChanged {
                character: live.id(),
                gold,
            },
        );
    }

    pub(crate) fn publish_vitals(&self, live: &LiveCharacter) -> Result<()> {
        self.publish_near(
            live,
            GameEvent::VitalsChanged {
                character: live.id(),
                hp: live.vitals().hp(),
                chi: live.vitals().chi(),
            },
        )
    }
}
