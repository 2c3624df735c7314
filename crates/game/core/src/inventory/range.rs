//! Semantic layout of the 450-slot inventory array.
//!
//! A slot's index determines what it is for. [`SlotRange::accepts`] checks an
//! item's usage class against a destination and [`transfer_allowed`] checks
//! whether items may move between two ranges at all.

use core::ops::RangeInclusive;

use crate::env::{ItemClass, ItemDefinition};
use crate::error::Rejection;

pub type SlotIndex = u16;

pub const WEAPON_SLOT: SlotIndex = 3;
pub const SECONDARY_WEAPON_SLOT: SlotIndex = 4;
pub const PET_SLOT: SlotIndex = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotRange {
    Equip,
    Bag,
    Bank,
    HtArmor,
    BuffItemsA,
    Marbles,
    BoxOpener,
    Trash,
    Expansion,
    ExpandedBag,
    BuffItemsB,
    Reserved,
}

impl SlotRange {
    pub const fn bounds(self) -> (SlotIndex, SlotIndex) {
        match self {
            Self::Equip => (0, 10),
            Self::Bag => (11, 66),
            Self::Bank => (67, 306),
            Self::HtArmor => (307, 315),
            Self::BuffItemsA => (316, 319),
            Self::Marbles => (320, 329),
            Self::BoxOpener => (330, 335),
            Self::Trash => (336, 336),
            Self::Expansion => (337, 340),
            Self::ExpandedBag => (341, 396),
            Self::BuffItemsB => (397, 400),
            Self::Reserved => (401, 449),
        }
    }

    pub fn indices(self) -> RangeInclusive<SlotIndex> {
        let (start, end) = self.bounds();
        start..=end
    }

    pub fn contains(self, index: SlotIndex) -> bool {
        self.indices().contains(&index)
    }

    /// Range owning `index`, or `None` past the end of the array.
    pub fn of(index: SlotIndex) -> Option<SlotRange> {
        use strum::IntoEnumIterator;
        SlotRange::iter().find(|range| range.contains(index))
    }

    /// Whether items in this range feed the stat pipeline.
    pub fn affects_stats(self) -> bool {
        matches!(
            self,
            Self::Equip | Self::HtArmor | Self::BuffItemsA | Self::BuffItemsB | Self::Marbles
        )
    }

    /// Ranges searched for free space when adding an item.
    pub fn is_pack(self) -> bool {
        matches!(self, Self::Bag | Self::ExpandedBag)
    }

    /// Checks that `definition` may be placed at `index` (which must lie in
    /// this range) given the open storage.
    pub fn accepts(
        self,
        index: SlotIndex,
        definition: &ItemDefinition,
        context: SlotContext,
    ) -> Result<(), Rejection> {
        let fits = match self {
            Self::Equip => match definition.class {
                ItemClass::Equipment { slot } => {
                    slot == index || (slot == WEAPON_SLOT && index == SECONDARY_WEAPON_SLOT)
                }
                ItemClass::Pet => index == PET_SLOT,
                _ => false,
            },
            Self::Bag | Self::Trash => true,
            Self::Bank => {
                if context.storage != StorageMode::Bank {
                    return Err(Rejection::StorageClosed);
                }
                definition.bankable
            }
            Self::HtArmor => match definition.class {
                ItemClass::HtArmor { slot } => self.bounds().0.checked_add(slot) == Some(index),
                _ => false,
            },
            Self::BuffItemsA | Self::BuffItemsB => {
                matches!(definition.class, ItemClass::BuffItem { .. })
            }
            Self::Marbles => matches!(definition.class, ItemClass::Marble),
            Self::BoxOpener => {
                if context.storage != StorageMode::BoxOpener {
                    return Err(Rejection::StorageClosed);
                }
                matches!(definition.class, ItemClass::Box)
            }
            Self::Expansion => matches!(definition.class, ItemClass::Expansion),
            Self::ExpandedBag => {
                if !context.expansion_active {
                    return Err(Rejection::StorageClosed);
                }
                true
            }
            Self::Reserved => false,
        };
        if fits {
            Ok(())
        } else {
            Err(Rejection::WrongSlotClass)
        }
    }
}

/// Which storage window the player currently has open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StorageMode {
    #[default]
    None,
    Bank,
    BoxOpener,
}

/// Character-side facts that gate slot ranges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlotContext {
    pub storage: StorageMode,
    /// A bag-expansion buff is live, unlocking [`SlotRange::ExpandedBag`].
    pub expansion_active: bool,
}

impl SlotContext {
    pub fn new(storage: StorageMode, expansion_active: bool) -> Self {
        Self {
            storage,
            expansion_active,
        }
    }
}

/// Transfer rule table between two ranges.
///
/// Pack ranges (bag, expanded bag) talk to every range except the reserved
/// one. Bank and box-opener moves additionally require their window to be
/// open. Any other pair must stay within one range.
pub fn transfer_allowed(
    from: SlotRange,
    to: SlotRange,
    context: SlotContext,
) -> Result<(), Rejection> {
    use SlotRange::*;

    match (from, to) {
        (Reserved, _) | (_, Reserved) => Err(Rejection::TransferNotAllowed),
        (Bank, other) | (other, Bank) => {
            if context.storage != StorageMode::Bank {
                Err(Rejection::StorageClosed)
            } else if other == Bank || other.is_pack() {
                Ok(())
            } else {
                Err(Rejection::TransferNotAllowed)
            }
        }
        (BoxOpener, other) | (other, BoxOpener) => {
            if context.storage != StorageMode::BoxOpener {
                Err(Rejection::StorageClosed)
            } else if other == BoxOpener || other.is_pack() {
                Ok(())
            } else {
                Err(Rejection::TransferNotAllowed)
            }
        }
        (a, b) if a == b || a.is_pack() || b.is_pack() => Ok(()),
        _ => Err(Rejection::TransferNotAllowed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ItemId;

    #[test]
    fn ranges_tile_the_whole_array() {
        use strum::IntoEnumIterator;
        let mut next = 0;
        for range in SlotRange::iter() {
            let (start, end) = range.bounds();
            assert_eq!(start, next, "{range} starts at {start}");
            next = end + 1;
        }
        assert_eq!(usize::from(next), crate::config::GameConfig::INVENTORY_SLOTS);
        assert_eq!(SlotRange::of(450), None);
        assert_eq!(SlotRange::of(11), Some(SlotRange::Bag));
        assert_eq!(SlotRange::of(336), Some(SlotRange::Trash));
    }

    #[test]
    fn bank_requires_open_bank() {
        let closed = SlotContext::default();
        let open = SlotContext::new(StorageMode::Bank, false);
        assert_eq!(
            transfer_allowed(SlotRange::Bag, SlotRange::Bank, closed),
            Err(Rejection::StorageClosed)
        );
        assert_eq!(transfer_allowed(SlotRange::Bag, SlotRange::Bank, open), Ok(()));
        assert_eq!(transfer_allowed(SlotRange::Bank, SlotRange::Bank, open), Ok(()));
        assert_eq!(
            transfer_allowed(SlotRange::Bank, SlotRange::Equip, open),
            Err(Rejection::TransferNotAllowed)
        );
    }

    #[test]
    fn non_pack_ranges_do_not_mix() {
        let context = SlotContext::default();
        assert_eq!(transfer_allowed(SlotRange::Equip, SlotRange::Equip, context), Ok(()));
        assert_eq!(transfer_allowed(SlotRange::Marbles, SlotRange::Bag, context), Ok(()));
        assert_eq!(
            transfer_allowed(SlotRange::Equip, SlotRange::HtArmor, context),
            Err(Rejection::TransferNotAllowed)
        );
    }

    #[test]
    fn weapons_fit_both_weapon_slots() {
        let sword = ItemDefinition::new(ItemId(1), ItemClass::Equipment { slot: WEAPON_SLOT });
        let context = SlotContext::default();
        assert_eq!(SlotRange::Equip.accepts(WEAPON_SLOT, &sword, context), Ok(()));
        assert_eq!(
            SlotRange::Equip.accepts(SECONDARY_WEAPON_SLOT, &sword, context),
            Ok(())
        );
        assert_eq!(
            SlotRange::Equip.accepts(0, &sword, context),
            Err(Rejection::WrongSlotClass)
        );
    }

    #[test]
    fn out_of_range_ht_slot_is_refused() {
        let context = SlotContext::default();
        let helm = ItemDefinition::new(ItemId(7), ItemClass::HtArmor { slot: 2 });
        assert_eq!(SlotRange::HtArmor.accepts(309, &helm, context), Ok(()));

        let broken = ItemDefinition::new(ItemId(8), ItemClass::HtArmor { slot: u16::MAX });
        assert_eq!(
            SlotRange::HtArmor.accepts(309, &broken, context),
            Err(Rejection::WrongSlotClass)
        );
    }
}
