use arrayvec::ArrayVec;

use super::pet::PetRecord;
use crate::config::GameConfig;
use crate::state::ItemId;

/// One addressable unit of the inventory array.
///
/// An empty slot has `item == ItemId::EMPTY` and every other field at its
/// default. The same type doubles as the payload of an add operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventorySlot {
    pub item: ItemId,
    pub quantity: u32,
    /// Upgrade level.
    pub plus: u8,
    /// Encoded upgrade-stone codes.
    pub upgrades: ArrayVec<u8, { GameConfig::MAX_UPGRADES }>,
    pub socket_count: u8,
    /// Encoded socket-stone codes, at most `socket_count`.
    pub sockets: ArrayVec<u8, { GameConfig::MAX_SOCKETS }>,
    /// Timed or wearable item switched on.
    pub activated: bool,
    /// Item bound to an ongoing action and not movable.
    pub in_use: bool,
    /// Remaining seconds of an activated timed item.
    pub timer: Option<u32>,
    pub pet: Option<PetRecord>,
}

impl InventorySlot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(item: ItemId, quantity: u32) -> Self {
        Self {
            item,
            quantity,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_plus(mut self, plus: u8) -> Self {
        self.plus = plus;
        self
    }

    #[must_use]
    pub fn with_timer(mut self, seconds: u32) -> Self {
        self.activated = true;
        self.timer = Some(seconds);
        self
    }

    #[must_use]
    pub fn with_pet(mut self, pet: PetRecord) -> Self {
        self.pet = Some(pet);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_empty()
    }

    /// Items merge only when both the id and the upgrade level match.
    pub fn stacks_with(&self, other: &InventorySlot) -> bool {
        !self.is_empty() && self.item == other.item && self.plus == other.plus
    }

    /// Activated or in-use items are pinned to their slot.
    pub fn is_locked(&self) -> bool {
        self.activated || self.in_use
    }

    /// Empties the slot and returns the previous contents.
    pub fn take(&mut self) -> InventorySlot {
        core::mem::take(self)
    }

    /// Copy of this slot carrying only `quantity` units.
    pub fn split_off(&self, quantity: u32) -> InventorySlot {
        InventorySlot {
            quantity,
            activated: false,
            in_use: false,
            timer: None,
            pet: None,
            ..self.clone()
        }
    }

    /// Adds a stone to the first free upgrade position.
    pub fn add_upgrade(&mut self, code: u8) -> bool {
        self.upgrades.try_push(code).is_ok()
    }

    /// Fills the next open socket.
    pub fn add_socket(&mut self, code: u8) -> bool {
        if self.sockets.len() >= usize::from(self.socket_count) {
            return false;
        }
        self.sockets.try_push(code).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_leaves_empty_slot() {
        let mut slot = InventorySlot::new(ItemId(5), 3).with_plus(2);
        let taken = slot.take();
        assert!(slot.is_empty());
        assert_eq!(slot, InventorySlot::empty());
        assert_eq!(taken.quantity, 3);
    }

    #[test]
    fn sockets_respect_socket_count() {
        let mut slot = InventorySlot::new(ItemId(5), 1);
        slot.socket_count = 1;
        assert!(slot.add_socket(9));
        assert!(!slot.add_socket(9));
    }

    #[test]
    fn stacking_requires_same_plus() {
        let a = InventorySlot::new(ItemId(5), 1);
        assert!(a.stacks_with(&InventorySlot::new(ItemId(5), 4)));
        assert!(!a.stacks_with(&InventorySlot::new(ItemId(5), 4).with_plus(1)));
        assert!(!InventorySlot::empty().stacks_with(&InventorySlot::empty()));
    }
}
