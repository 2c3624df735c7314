//! Inventory slot store.
//!
//! A character owns a fixed array of 450 [`InventorySlot`]s. The index of a
//! slot determines its role (see [`SlotRange`]); [`Inventory`] implements the
//! add/remove/swap/split/combine/decrement protocol on top of that layout.

mod pet;
mod range;
mod slot;
mod store;

pub use pet::{PetRecord, PetTick};
pub use range::{
    PET_SLOT, SECONDARY_WEAPON_SLOT, SlotContext, SlotIndex, SlotRange, StorageMode, WEAPON_SLOT,
    transfer_allowed,
};
pub use slot::InventorySlot;
pub use store::{
    AddOutcome, CombineOutcome, DecrementOutcome, ExpiredItem, Inventory, InventoryError,
    MoveOutcome, RemoveOutcome, Touched,
};
