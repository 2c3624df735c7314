//! In-memory repositories for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use mmo_core::{CharacterId, InventorySlot};

use super::error::{RepositoryError, Result};
use super::traits::{CharacterRepository, CharacterSnapshot, InventoryRepository};

/// In-memory implementation of both character repositories.
#[derive(Debug, Default)]
pub struct InMemoryCharacterStore {
    characters: RwLock<HashMap<CharacterId, CharacterSnapshot>>,
    inventories: RwLock<HashMap<CharacterId, Vec<InventorySlot>>>,
}

impl InMemoryCharacterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a character without going through the runtime.
    pub fn with_character(self, snapshot: CharacterSnapshot) -> Self {
        if let Ok(mut characters) = self.characters.write() {
            characters.insert(snapshot.id(), snapshot);
        }
        self
    }
}

impl CharacterRepository for InMemoryCharacterStore {
    fn load(&self, id: CharacterId) -> Result<Option<CharacterSnapshot>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.get(&id).cloned())
    }

    fn save(&self, snapshot: &CharacterSnapshot) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.insert(snapshot.id(), snapshot.clone());
        Ok(())
    }

    fn delete(&self, id: CharacterId) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.remove(&id);
        Ok(())
    }

    fn exists(&self, id: CharacterId) -> bool {
        self.characters
            .read()
            .map(|characters| characters.contains_key(&id))
            .unwrap_or(false)
    }

    fn list_ids(&self) -> Result<Vec<CharacterId>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<CharacterId> = characters.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

impl InventoryRepository for InMemoryCharacterStore {
    fn load_slots(&self, id: CharacterId) -> Result<Option<Vec<InventorySlot>>> {
        let inventories = self
            .inventories
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(inventories.get(&id).cloned())
    }

    fn save_slots(&self, id: CharacterId, slots: &[InventorySlot]) -> Result<()> {
        let mut inventories = self
            .inventories
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        inventories.insert(id, slots.to_vec());
        Ok(())
    }

    fn delete_slots(&self, id: CharacterId) -> Result<()> {
        let mut inventories = self
            .inventories
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        inventories.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmo_core::{CharacterRecord, ItemId, JobClass, Position, StatRecord};

    #[test]
    fn save_load_delete() {
        let store = InMemoryCharacterStore::new();
        let record = CharacterRecord::new(CharacterId(4), "mem", JobClass::Monk, Position::default());
        let snapshot = CharacterSnapshot::new(record, StatRecord::default());

        store.save(&snapshot).unwrap();
        assert!(store.exists(CharacterId(4)));
        assert_eq!(store.load(CharacterId(4)).unwrap(), Some(snapshot));

        store.delete(CharacterId(4)).unwrap();
        assert!(!store.exists(CharacterId(4)));
    }

    #[test]
    fn slots_are_stored_per_character() {
        let store = InMemoryCharacterStore::new();
        let slots = vec![InventorySlot::new(ItemId(1), 2)];
        store.save_slots(CharacterId(1), &slots).unwrap();

        assert_eq!(store.load_slots(CharacterId(1)).unwrap(), Some(slots));
        assert_eq!(store.load_slots(CharacterId(2)).unwrap(), None);
    }
}
