use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use mmo_core::{CharacterId, DropId, Epoch, InventorySlot, Position};

use crate::api::Result;
use crate::live::{read, write};

/// Loot lying on the ground.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroundDrop {
    pub id: DropId,
    pub slot: InventorySlot,
    pub position: Position,
    /// Character the loot was meant for; `None` means anyone may take it.
    pub owner: Option<CharacterId>,
    /// Server time at which the drop vanishes.
    pub expires_at: Epoch,
}

#[derive(Debug, Default)]
pub struct DropRegistry {
    drops: RwLock<HashMap<DropId, GroundDrop>>,
    next_id: AtomicU64,
}

impl DropRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &self,
        slot: InventorySlot,
        position: Position,
        owner: Option<CharacterId>,
        expires_at: Epoch,
    ) -> Result<GroundDrop> {
        let id = DropId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let drop = GroundDrop {
            id,
            slot,
            position,
            owner,
            expires_at,
        };
        write(&self.drops)?.insert(id, drop.clone());
        Ok(drop)
    }

    /// Removes the drop; only one caller ever gets it.
    pub fn take(&self, id: DropId) -> Result<Option<GroundDrop>> {
        Ok(write(&self.drops)?.remove(&id))
    }

    /// Puts back a drop whose pick-up was rejected.
    pub fn restore(&self, drop: GroundDrop) -> Result<()> {
        write(&self.drops)?.insert(drop.id, drop);
        Ok(())
    }

    /// Removes and returns every drop whose deadline is at or before `now`.
    pub fn take_expired(&self, now: Epoch) -> Result<Vec<GroundDrop>> {
        let mut drops = write(&self.drops)?;
        let due: Vec<DropId> = drops
            .values()
            .filter(|drop| drop.expires_at <= now)
            .map(|drop| drop.id)
            .collect();
        Ok(due.into_iter().filter_map(|id| drops.remove(&id)).collect())
    }

    pub fn get(&self, id: DropId) -> Result<Option<GroundDrop>> {
        Ok(read(&self.drops)?.get(&id).cloned())
    }

    pub fn near(&self, center: &Position, radius: u32) -> Result<Vec<DropId>> {
        Ok(read(&self.drops)?
            .values()
            .filter(|drop| drop.position.within(center, radius))
            .map(|drop| drop.id)
            .collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(read(&self.drops)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&self) -> Result<()> {
        write(&self.drops)?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmo_core::ItemId;

    #[test]
    fn a_drop_is_taken_once() {
        let registry = DropRegistry::new();
        let drop = registry
            .spawn(InventorySlot::new(ItemId(4), 1), Position::default(), None, Epoch(60))
            .unwrap();

        assert!(registry.take(drop.id).unwrap().is_some());
        assert!(registry.take(drop.id).unwrap().is_none());

        registry.restore(drop.clone()).unwrap();
        assert_eq!(registry.get(drop.id).unwrap(), Some(drop));
    }

    #[test]
    fn only_overdue_drops_are_swept() {
        let registry = DropRegistry::new();
        let early = registry
            .spawn(InventorySlot::new(ItemId(4), 1), Position::default(), None, Epoch(10))
            .unwrap();
        let late = registry
            .spawn(InventorySlot::new(ItemId(5), 1), Position::default(), None, Epoch(20))
            .unwrap();

        assert!(registry.take_expired(Epoch(9)).unwrap().is_empty());
        let swept = registry.take_expired(Epoch(10)).unwrap();
        assert_eq!(swept, vec![early]);
        assert_eq!(registry.get(late.id).unwrap(), Some(late));
    }
}
