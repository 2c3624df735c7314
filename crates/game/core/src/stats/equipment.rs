//! Stat grants of equipped items.

use std::collections::BTreeSet;

use super::delta::StatDelta;
use crate::config::GameConfig;
use crate::env::{ItemClass, ItemDefinition, ItemOracle};
use crate::inventory::{Inventory, InventorySlot, SECONDARY_WEAPON_SLOT, SlotRange, WEAPON_SLOT};
use crate::state::ItemId;

/// Ranges whose items feed the pipeline, in walk order.
const STAT_RANGES: [SlotRange; 5] = [
    SlotRange::Equip,
    SlotRange::HtArmor,
    SlotRange::BuffItemsA,
    SlotRange::BuffItemsB,
    SlotRange::Marbles,
];

/// Sums the grants of every equipped item, its stones, and qualifying set
/// bonuses.
///
/// The secondary weapon slot only counts while the main weapon slot is
/// empty. Buff items count only while activated. Items without a definition
/// contribute nothing.
pub fn equipment_delta(inventory: &Inventory, items: &dyn ItemOracle) -> StatDelta {
    let main_weapon_equipped = inventory
        .slot(WEAPON_SLOT)
        .is_some_and(|slot| !slot.is_empty());

    let mut total = StatDelta::ZERO;
    let mut worn: BTreeSet<ItemId> = BTreeSet::new();

    for range in STAT_RANGES {
        for index in range.indices() {
            if index == SECONDARY_WEAPON_SLOT && main_weapon_equipped {
                continue;
            }
            let Some(slot) = inventory.slot(index).filter(|slot| !slot.is_empty()) else {
                continue;
            };
            if matches!(range, SlotRange::BuffItemsA | SlotRange::BuffItemsB) && !slot.activated {
                continue;
            }
            let Some(definition) = items.definition(slot.item) else {
                continue;
            };
            if matches!(definition.class, ItemClass::Pet) {
                continue;
            }
            total += item_delta(&definition, slot, items);
            if matches!(range, SlotRange::Equip | SlotRange::HtArmor) {
                worn.insert(slot.item);
            }
        }
    }

    for set in items.sets() {
        if !set.items.is_empty() && set.items.iter().all(|id| worn.contains(id)) {
            total += set.bonus;
        }
    }
    total
}

/// Grant of one item at its plus level, including its upgrade and socket stones.
pub fn item_delta(definition: &ItemDefinition, slot: &InventorySlot, items: &dyn ItemOracle) -> StatDelta {
    let own = StatDelta::scaled(&definition.stats, &definition.per_plus, slot.plus);
    let stones: StatDelta = slot
        .upgrades
        .iter()
        .chain(slot.sockets.iter())
        .map(|code| stone_delta(*code, items, 0))
        .sum();
    own + stones
}

fn stone_delta(code: u8, items: &dyn ItemOracle, depth: usize) -> StatDelta {
    if depth >= GameConfig::MAX_STONE_DEPTH {
        return StatDelta::ZERO;
    }
    let Some(stone) = items.stone(code) else {
        return StatDelta::ZERO;
    };
    let nested: StatDelta = stone
        .components
        .iter()
        .map(|inner| stone_delta(*inner, items, depth + 1))
        .sum();
    stone.stats + nested
}
