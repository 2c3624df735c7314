//! The per-character slot store.
//!
//! Every mutation validates fully before it touches a slot, so a rejected
//! operation leaves the array exactly as it was.

use arrayvec::ArrayVec;

use super::pet::PetRecord;
use super::range::{PET_SLOT, SlotContext, SlotIndex, SlotRange, transfer_allowed};
use super::slot::InventorySlot;
use crate::config::GameConfig;
use crate::env::{ItemDefinition, ItemOracle, OracleError};
use crate::error::{ActionError, ErrorSeverity, GameError, Rejection};
use crate::state::ItemId;

/// Slots touched by one operation, for the presentation layer.
pub type Touched = ArrayVec<SlotIndex, 2>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddOutcome {
    /// Slot the item (or the first part of it) landed in.
    pub slot: SlotIndex,
    pub touched: Touched,
    pub stats_dirty: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub touched: Touched,
    /// Either endpoint feeds the stat pipeline.
    pub stats_dirty: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombineOutcome {
    pub moved: u32,
    pub touched: Touched,
    pub stats_dirty: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub removed: InventorySlot,
    pub stats_dirty: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecrementOutcome {
    pub remaining: u32,
    pub stats_dirty: bool,
}

/// A timed item whose timer ran out during [`Inventory::tick_timers`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpiredItem {
    pub slot: SlotIndex,
    pub item: ItemId,
    pub stats_dirty: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("inventory holds {found} slots, expected at most {expected}")]
    SlotCountMismatch { found: usize, expected: usize },
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SlotCountMismatch { .. } => "INVENTORY_SLOT_COUNT_MISMATCH",
        }
    }
}

/// Fixed-size slot array owned by one character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    slots: Vec<InventorySlot>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            slots: vec![InventorySlot::empty(); GameConfig::INVENTORY_SLOTS],
        }
    }

    /// Rebuilds an inventory from persisted slots, padding with empty ones.
    pub fn from_slots(mut slots: Vec<InventorySlot>) -> Result<Self, InventoryError> {
        if slots.len() > GameConfig::INVENTORY_SLOTS {
            return Err(InventoryError::SlotCountMismatch {
                found: slots.len(),
                expected: GameConfig::INVENTORY_SLOTS,
            });
        }
        slots.resize(GameConfig::INVENTORY_SLOTS, InventorySlot::empty());
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<InventorySlot> {
        self.slots
    }

    pub fn slot(&self, index: SlotIndex) -> Option<&InventorySlot> {
        self.slots.get(usize::from(index))
    }

    /// Mutable access for flag changes (activation, in-use). Moves and
    /// quantity changes go through the validated operations.
    pub fn slot_mut(&mut self, index: SlotIndex) -> Option<&mut InventorySlot> {
        self.slots.get_mut(usize::from(index))
    }

    /// Occupied slots with their indices.
    pub fn occupied(&self) -> impl Iterator<Item = (SlotIndex, &InventorySlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.is_empty())
            .map(|(index, slot)| (index as SlotIndex, slot))
    }

    /// Total quantity of `item` across all slots.
    pub fn count(&self, item: ItemId) -> u64 {
        self.occupied()
            .filter(|(_, slot)| slot.item == item)
            .map(|(_, slot)| u64::from(slot.quantity))
            .sum()
    }

    pub fn find(&self, item: ItemId) -> Option<SlotIndex> {
        self.occupied()
            .find(|(_, slot)| slot.item == item)
            .map(|(index, _)| index)
    }

    pub fn pet(&self) -> Option<&PetRecord> {
        self.slot(PET_SLOT).and_then(|slot| slot.pet.as_ref())
    }

    pub fn pet_mut(&mut self) -> Option<&mut PetRecord> {
        self.slot_mut(PET_SLOT).and_then(|slot| slot.pet.as_mut())
    }

    /// Pack slots searched for space: the bag, then the expanded bag when an
    /// expansion buff is live.
    fn pack_indices(context: SlotContext) -> impl Iterator<Item = SlotIndex> + Clone {
        let expanded = SlotRange::ExpandedBag
            .indices()
            .filter(move |_| context.expansion_active);
        SlotRange::Bag.indices().chain(expanded)
    }

    pub fn free_pack_slots(&self, context: SlotContext) -> usize {
        Self::pack_indices(context)
            .filter(|index| self.slots[usize::from(*index)].is_empty())
            .count()
    }

    fn checked(&self, index: SlotIndex) -> Result<(SlotRange, &InventorySlot), Rejection> {
        let slot = self.slot(index).ok_or(Rejection::InvalidSlot)?;
        let range = SlotRange::of(index).ok_or(Rejection::InvalidSlot)?;
        Ok((range, slot))
    }

    fn definition(items: &dyn ItemOracle, id: ItemId) -> Result<ItemDefinition, OracleError> {
        items.definition(id).ok_or(OracleError::UnknownItem(id))
    }

    /// Places `stack` into the inventory.
    ///
    /// With `requested` set (and `is_loot` false) the item must go into that
    /// exact slot, which has to be empty and accept the item. Otherwise a
    /// stackable item first merges into an existing stack of the same item
    /// and plus that is below the cap; whatever does not fit spills, as one
    /// stack, into the first free pack slot. Loot always takes the automatic
    /// path.
    pub fn add_item(
        &mut self,
        stack: InventorySlot,
        requested: Option<SlotIndex>,
        is_loot: bool,
        context: SlotContext,
        items: &dyn ItemOracle,
        config: &GameConfig,
    ) -> Result<AddOutcome, ActionError> {
        if stack.is_empty() {
            return Err(Rejection::EmptySlot.into());
        }
        if stack.quantity == 0 {
            return Err(Rejection::InsufficientQuantity.into());
        }
        let definition = Self::definition(items, stack.item)?;

        if let Some(index) = requested.filter(|_| !is_loot) {
            let (range, slot) = self.checked(index)?;
            if !slot.is_empty() {
                return Err(Rejection::SlotOccupied.into());
            }
            range.accepts(index, &definition, context)?;
            self.slots[usize::from(index)] = stack;
            let mut touched = Touched::new();
            touched.push(index);
            return Ok(AddOutcome {
                slot: index,
                touched,
                stats_dirty: range.affects_stats(),
            });
        }

        let pack = Self::pack_indices(context);
        let mut touched = Touched::new();

        if definition.stackable {
            let existing = pack.clone().find(|index| {
                let slot = &self.slots[usize::from(*index)];
                slot.stacks_with(&stack) && slot.quantity < config.stack_cap
            });
            if let Some(index) = existing {
                let held = self.slots[usize::from(index)].quantity;
                let moved = (config.stack_cap - held).min(stack.quantity);
                let remainder = stack.quantity - moved;
                let spill = if remainder > 0 {
                    let free = pack
                        .clone()
                        .find(|free| self.slots[usize::from(*free)].is_empty())
                        .ok_or(Rejection::InsufficientSpace)?;
                    Some(free)
                } else {
                    None
                };

                self.slots[usize::from(index)].quantity = held + moved;
                touched.push(index);
                if let Some(free) = spill {
                    self.slots[usize::from(free)] = stack.split_off(remainder);
                    touched.push(free);
                }
                return Ok(AddOutcome {
                    slot: index,
                    touched,
                    stats_dirty: false,
                });
            }
        }

        let free = pack
            .clone()
            .find(|index| self.slots[usize::from(*index)].is_empty())
            .ok_or(Rejection::InsufficientSpace)?;
        self.slots[usize::from(free)] = stack;
        touched.push(free);
        Ok(AddOutcome {
            slot: free,
            touched,
            stats_dirty: false,
        })
    }

    /// Empties a slot and returns what it held.
    pub fn remove_item(&mut self, index: SlotIndex) -> Result<RemoveOutcome, Rejection> {
        let (range, slot) = self.checked(index)?;
        if slot.is_empty() {
            return Err(Rejection::EmptySlot);
        }
        if slot.in_use {
            return Err(Rejection::ItemInUse);
        }
        let removed = self.slots[usize::from(index)].take();
        Ok(RemoveOutcome {
            removed,
            stats_dirty: range.affects_stats(),
        })
    }

    /// Exchanges two slots. With one side empty this is a plain move.
    pub fn swap_items(
        &mut self,
        a: SlotIndex,
        b: SlotIndex,
        context: SlotContext,
        items: &dyn ItemOracle,
    ) -> Result<MoveOutcome, ActionError> {
        if a == b {
            return Err(Rejection::InvalidSlot.into());
        }
        let (range_a, slot_a) = self.checked(a)?;
        let (range_b, slot_b) = self.checked(b)?;
        if slot_a.is_empty() && slot_b.is_empty() {
            return Err(Rejection::EmptySlot.into());
        }
        transfer_allowed(range_a, range_b, context)?;

        for (range, slot) in [(range_a, slot_a), (range_b, slot_b)] {
            if !slot.is_empty() && Self::pinned(range, slot) {
                return Err(Rejection::ItemInUse.into());
            }
        }
        if !slot_a.is_empty() {
            range_b.accepts(b, &Self::definition(items, slot_a.item)?, context)?;
        }
        if !slot_b.is_empty() {
            range_a.accepts(a, &Self::definition(items, slot_b.item)?, context)?;
        }

        self.slots.swap(usize::from(a), usize::from(b));
        Ok(MoveOutcome {
            touched: Touched::from_iter([a, b]),
            stats_dirty: range_a.affects_stats() || range_b.affects_stats(),
        })
    }

    /// Moves `quantity` units of a stack into an empty slot.
    pub fn split_item(
        &mut self,
        from: SlotIndex,
        to: SlotIndex,
        quantity: u32,
        context: SlotContext,
        items: &dyn ItemOracle,
    ) -> Result<MoveOutcome, ActionError> {
        if from == to {
            return Err(Rejection::InvalidSlot.into());
        }
        let (range_from, source) = self.checked(from)?;
        let (range_to, target) = self.checked(to)?;
        if source.is_empty() {
            return Err(Rejection::EmptySlot.into());
        }
        if !target.is_empty() {
            return Err(Rejection::SlotOccupied.into());
        }
        if quantity == 0 || quantity >= source.quantity {
            return Err(Rejection::InsufficientQuantity.into());
        }
        if source.is_locked() {
            return Err(Rejection::ItemInUse.into());
        }
        let definition = Self::definition(items, source.item)?;
        if !definition.stackable {
            return Err(Rejection::NotStackable.into());
        }
        transfer_allowed(range_from, range_to, context)?;
        range_to.accepts(to, &definition, context)?;

        let part = source.split_off(quantity);
        self.slots[usize::from(from)].quantity -= quantity;
        self.slots[usize::from(to)] = part;
        Ok(MoveOutcome {
            touched: Touched::from_iter([from, to]),
            stats_dirty: range_from.affects_stats() || range_to.affects_stats(),
        })
    }

    /// Moves as much of `from` onto the matching stack at `to` as the cap allows.
    pub fn combine_items(
        &mut self,
        from: SlotIndex,
        to: SlotIndex,
        context: SlotContext,
        items: &dyn ItemOracle,
        config: &GameConfig,
    ) -> Result<CombineOutcome, ActionError> {
        if from == to {
            return Err(Rejection::InvalidSlot.into());
        }
        let (range_from, source) = self.checked(from)?;
        let (range_to, target) = self.checked(to)?;
        if source.is_empty() || target.is_empty() {
            return Err(Rejection::EmptySlot.into());
        }
        if !source.stacks_with(target) {
            return Err(Rejection::NotStackable.into());
        }
        if source.is_locked() || target.is_locked() {
            return Err(Rejection::ItemInUse.into());
        }
        if !Self::definition(items, source.item)?.stackable {
            return Err(Rejection::NotStackable.into());
        }
        transfer_allowed(range_from, range_to, context)?;

        let room = config.stack_cap.saturating_sub(target.quantity);
        if room == 0 {
            return Err(Rejection::StackFull.into());
        }
        let moved = room.min(source.quantity);

        self.slots[usize::from(to)].quantity += moved;
        let source = &mut self.slots[usize::from(from)];
        source.quantity -= moved;
        if source.quantity == 0 {
            source.take();
        }
        Ok(CombineOutcome {
            moved,
            touched: Touched::from_iter([from, to]),
            stats_dirty: range_from.affects_stats() || range_to.affects_stats(),
        })
    }

    /// Consumes `amount` units, emptying the slot when it reaches zero.
    pub fn decrement_item(
        &mut self,
        index: SlotIndex,
        amount: u32,
    ) -> Result<DecrementOutcome, Rejection> {
        let (range, slot) = self.checked(index)?;
        if slot.is_empty() {
            return Err(Rejection::EmptySlot);
        }
        if amount == 0 || slot.quantity < amount {
            return Err(Rejection::InsufficientQuantity);
        }
        let slot = &mut self.slots[usize::from(index)];
        slot.quantity -= amount;
        if slot.quantity == 0 {
            slot.take();
        }
        Ok(DecrementOutcome {
            remaining: slot.quantity,
            stats_dirty: range.affects_stats(),
        })
    }

    /// Counts down every running item timer by one second and removes the
    /// items whose timer reached zero.
    pub fn tick_timers(&mut self) -> Vec<ExpiredItem> {
        let mut expired = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !slot.activated {
                continue;
            }
            let Some(remaining) = slot.timer.as_mut() else {
                continue;
            };
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                let index = index as SlotIndex;
                let item = slot.take().item;
                expired.push(ExpiredItem {
                    slot: index,
                    item,
                    stats_dirty: SlotRange::of(index).is_some_and(SlotRange::affects_stats),
                });
            }
        }
        expired
    }

    /// Removes every slot matching `predicate`, ignoring locks. Used for
    /// forced drops on death.
    pub fn remove_where(
        &mut self,
        mut predicate: impl FnMut(&InventorySlot) -> bool,
    ) -> Vec<(SlotIndex, InventorySlot)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| !slot.is_empty() && predicate(slot))
            .map(|(index, slot)| (index as SlotIndex, slot.take()))
            .collect()
    }

    /// In-use items never move; activated items never leave a stat range.
    fn pinned(range: SlotRange, slot: &InventorySlot) -> bool {
        slot.in_use || (slot.activated && range.affects_stats())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::env::{ItemClass, ItemSetDefinition};
    use crate::inventory::range::{StorageMode, WEAPON_SLOT};

    struct Catalogue(HashMap<ItemId, ItemDefinition>);

    impl ItemOracle for Catalogue {
        fn definition(&self, id: ItemId) -> Option<ItemDefinition> {
            self.0.get(&id).cloned()
        }

        fn stone(&self, _code: u8) -> Option<ItemDefinition> {
            None
        }

        fn sets(&self) -> &[ItemSetDefinition] {
            &[]
        }
    }

    const POTION: ItemId = ItemId(100);
    const SWORD: ItemId = ItemId(200);
    const HELM: ItemId = ItemId(201);
    const BOUND: ItemId = ItemId(300);

    fn catalogue() -> Catalogue {
        let defs = [
            ItemDefinition::new(
                POTION,
                ItemClass::Consumable {
                    tag: crate::consumable::ConsumableTag::HealHp,
                    magnitude: 50,
                    buff: None,
                },
            )
            .stackable(),
            ItemDefinition::new(SWORD, ItemClass::Equipment { slot: WEAPON_SLOT }),
            ItemDefinition::new(HELM, ItemClass::Equipment { slot: 0 }),
            ItemDefinition::new(BOUND, ItemClass::Material).bound(),
        ];
        Catalogue(defs.into_iter().map(|d| (d.id, d)).collect())
    }

    fn multiset(inventory: &Inventory) -> Vec<(ItemId, u32, u8)> {
        let mut items: Vec<_> = inventory
            .occupied()
            .map(|(_, slot)| (slot.item, slot.quantity, slot.plus))
            .collect();
        items.sort();
        items
    }

    #[test]
    fn stacking_spills_remainder_into_one_new_slot() {
        let items = catalogue();
        let config = GameConfig::default();
        let context = SlotContext::default();
        let mut inventory = Inventory::new();

        let first = inventory
            .add_item(InventorySlot::new(POTION, 5), None, false, context, &items, &config)
            .unwrap();
        assert_eq!(first.slot, 11);
        assert_eq!(inventory.slot(11).unwrap().quantity, 5);

        let second = inventory
            .add_item(InventorySlot::new(POTION, 20_000), None, false, context, &items, &config)
            .unwrap();
        assert_eq!(second.slot, 11);
        assert_eq!(second.touched.as_slice(), &[11, 12]);
        assert_eq!(inventory.slot(11).unwrap().quantity, 10_000);
        assert_eq!(inventory.slot(12).unwrap().quantity, 10_005);
        assert_eq!(inventory.count(POTION), 20_005);
    }

    #[test]
    fn requested_slot_must_be_empty_and_legal() {
        let items = catalogue();
        let config = GameConfig::default();
        let context = SlotContext::default();
        let mut inventory = Inventory::new();

        let placed = inventory
            .add_item(InventorySlot::new(SWORD, 1), Some(WEAPON_SLOT), false, context, &items, &config)
            .unwrap();
        assert!(placed.stats_dirty);

        let occupied = inventory.add_item(
            InventorySlot::new(SWORD, 1),
            Some(WEAPON_SLOT),
            false,
            context,
            &items,
            &config,
        );
        assert_eq!(occupied, Err(Rejection::SlotOccupied.into()));

        let wrong = inventory.add_item(
            InventorySlot::new(POTION, 1),
            Some(0),
            false,
            context,
            &items,
            &config,
        );
        assert_eq!(wrong, Err(Rejection::WrongSlotClass.into()));
    }

    #[test]
    fn full_bag_rejects_without_mutation() {
        let items = catalogue();
        let config = GameConfig::default();
        let context = SlotContext::default();
        let mut inventory = Inventory::new();
        for _ in SlotRange::Bag.indices() {
            inventory
                .add_item(InventorySlot::new(SWORD, 1), None, false, context, &items, &config)
                .unwrap();
        }
        let before = inventory.clone();
        let result =
            inventory.add_item(InventorySlot::new(SWORD, 1), None, false, context, &items, &config);
        assert_eq!(result, Err(Rejection::InsufficientSpace.into()));
        assert_eq!(inventory, before);

        let expanded = SlotContext::new(StorageMode::None, true);
        let placed = inventory
            .add_item(InventorySlot::new(SWORD, 1), None, false, expanded, &items, &config)
            .unwrap();
        assert_eq!(placed.slot, SlotRange::ExpandedBag.bounds().0);
    }

    #[test]
    fn activated_equipment_cannot_leave_its_slot() {
        let items = catalogue();
        let config = GameConfig::default();
        let context = SlotContext::default();
        let mut inventory = Inventory::new();
        inventory
            .add_item(InventorySlot::new(SWORD, 1), Some(WEAPON_SLOT), false, context, &items, &config)
            .unwrap();
        inventory.slot_mut(WEAPON_SLOT).unwrap().activated = true;

        let before = multiset(&inventory);
        let result = inventory.swap_items(WEAPON_SLOT, 20, context, &items);
        assert_eq!(result, Err(Rejection::ItemInUse.into()));
        assert_eq!(multiset(&inventory), before);
    }

    #[test]
    fn swap_into_equip_marks_stats_dirty() {
        let items = catalogue();
        let config = GameConfig::default();
        let context = SlotContext::default();
        let mut inventory = Inventory::new();
        inventory
            .add_item(InventorySlot::new(HELM, 1), None, false, context, &items, &config)
            .unwrap();
        let moved = inventory.swap_items(11, 0, context, &items).unwrap();
        assert!(moved.stats_dirty);
        assert_eq!(inventory.slot(0).unwrap().item, HELM);

        let wrong = inventory.swap_items(0, WEAPON_SLOT, context, &items);
        assert_eq!(wrong, Err(Rejection::WrongSlotClass.into()));
    }

    #[test]
    fn bound_items_stay_out_of_the_bank() {
        let items = catalogue();
        let config = GameConfig::default();
        let bank = SlotContext::new(StorageMode::Bank, false);
        let mut inventory = Inventory::new();
        inventory
            .add_item(InventorySlot::new(BOUND, 1), None, false, bank, &items, &config)
            .unwrap();
        let result = inventory.swap_items(11, 67, bank, &items);
        assert_eq!(result, Err(Rejection::WrongSlotClass.into()));

        let closed = inventory.swap_items(11, 67, SlotContext::default(), &items);
        assert_eq!(closed, Err(Rejection::StorageClosed.into()));
    }

    #[test]
    fn split_then_combine_conserves_quantity() {
        let items = catalogue();
        let config = GameConfig::default();
        let context = SlotContext::default();
        let mut inventory = Inventory::new();
        inventory
            .add_item(InventorySlot::new(POTION, 40), None, false, context, &items, &config)
            .unwrap();

        inventory.split_item(11, 30, 15, context, &items).unwrap();
        assert_eq!(inventory.slot(11).unwrap().quantity, 25);
        assert_eq!(inventory.slot(30).unwrap().quantity, 15);
        assert_eq!(inventory.count(POTION), 40);

        let combined = inventory.combine_items(30, 11, context, &items, &config).unwrap();
        assert_eq!(combined.moved, 15);
        assert!(inventory.slot(30).unwrap().is_empty());
        assert_eq!(inventory.count(POTION), 40);
    }

    #[test]
    fn combine_stops_at_cap() {
        let items = catalogue();
        let config = GameConfig::default();
        let context = SlotContext::default();
        let mut inventory = Inventory::new();
        inventory
            .add_item(InventorySlot::new(POTION, 9_990), Some(11), false, context, &items, &config)
            .unwrap();
        inventory
            .add_item(InventorySlot::new(POTION, 50), Some(12), false, context, &items, &config)
            .unwrap();

        let combined = inventory.combine_items(12, 11, context, &items, &config).unwrap();
        assert_eq!(combined.moved, 10);
        assert_eq!(inventory.slot(11).unwrap().quantity, 10_000);
        assert_eq!(inventory.slot(12).unwrap().quantity, 40);

        let full = inventory.combine_items(12, 11, context, &items, &config);
        assert_eq!(full, Err(Rejection::StackFull.into()));
    }

    #[test]
    fn rejected_split_leaves_inventory_untouched() {
        let items = catalogue();
        let config = GameConfig::default();
        let context = SlotContext::default();
        let mut inventory = Inventory::new();
        inventory
            .add_item(InventorySlot::new(POTION, 3), None, false, context, &items, &config)
            .unwrap();
        let before = inventory.clone();
        assert!(inventory.split_item(11, 12, 3, context, &items).is_err());
        assert!(inventory.split_item(11, 12, 0, context, &items).is_err());
        assert!(inventory.split_item(11, 449, 1, context, &items).is_err());
        assert_eq!(inventory, before);
    }

    #[test]
    fn decrement_clears_slot_at_zero() {
        let items = catalogue();
        let config = GameConfig::default();
        let context = SlotContext::default();
        let mut inventory = Inventory::new();
        inventory
            .add_item(InventorySlot::new(POTION, 2), None, false, context, &items, &config)
            .unwrap();
        assert_eq!(inventory.decrement_item(11, 3), Err(Rejection::InsufficientQuantity));
        assert_eq!(inventory.decrement_item(11, 1).unwrap().remaining, 1);
        assert_eq!(inventory.decrement_item(11, 1).unwrap().remaining, 0);
        assert!(inventory.slot(11).unwrap().is_empty());
    }

    #[test]
    fn timers_remove_expired_items() {
        let mut inventory = Inventory::new();
        inventory.slots[316] = InventorySlot::new(ItemId(900), 1).with_timer(2);
        assert!(inventory.tick_timers().is_empty());
        let expired = inventory.tick_timers();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].slot, 316);
        assert!(expired[0].stats_dirty);
        assert!(inventory.slot(316).unwrap().is_empty());
    }

    #[test]
    fn unknown_items_are_lookup_failures() {
        let items = catalogue();
        let config = GameConfig::default();
        let mut inventory = Inventory::new();
        let result = inventory.add_item(
            InventorySlot::new(ItemId(9_999), 1),
            None,
            false,
            SlotContext::default(),
            &items,
            &config,
        );
        assert_eq!(
            result,
            Err(ActionError::Lookup(OracleError::UnknownItem(ItemId(9_999))))
        );
    }

    #[test]
    fn from_slots_pads_short_arrays() {
        let inventory = Inventory::from_slots(vec![InventorySlot::new(SWORD, 1)]).unwrap();
        assert_eq!(inventory.slots().len(), GameConfig::INVENTORY_SLOTS);
        assert!(Inventory::from_slots(vec![InventorySlot::empty(); 451]).is_err());
    }
}
