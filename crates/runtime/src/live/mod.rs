//! Live, lock-guarded state of online characters and spawned NPCs.
//!
//! Each character owns its own locks; nothing here spans two characters.
//! When several of one character's locks are needed they are taken in this
//! order: `replace`, inventory, gold, record, base stats, buffs, derived
//! stats.

mod character;
mod npc;
mod sight;
mod vitals;

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use character::{InventoryGuard, LiveCharacter};
pub use npc::LiveNpc;
pub use sight::OnSight;
pub use vitals::{DamageApplied, Vitals};

use crate::api::{Result, RuntimeError};

pub(crate) fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| RuntimeError::LockPoisoned)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| RuntimeError::LockPoisoned)
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| RuntimeError::LockPoisoned)
}
