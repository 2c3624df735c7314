//! Repository contracts for saving and loading character state.
//!
//! Every call is fallible and none is retried here; the persistence worker
//! owns the retry policy.

use mmo_core::{Buff, CharacterId, CharacterRecord, InventorySlot, StatRecord};
use serde::{Deserialize, Serialize};

use super::error::Result;

/// Persisted character, stats and live buffs. Inventory slots are stored
/// separately because they are loaded lazily.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub record: CharacterRecord,
    pub stats: StatRecord,
    pub buffs: Vec<Buff>,
}

impl CharacterSnapshot {
    pub fn new(record: CharacterRecord, stats: StatRecord) -> Self {
        Self {
            record,
            stats,
            buffs: Vec::new(),
        }
    }

    pub fn id(&self) -> CharacterId {
        self.record.id
    }
}

pub trait CharacterRepository: Send + Sync {
    fn load(&self, id: CharacterId) -> Result<Option<CharacterSnapshot>>;

    fn save(&self, snapshot: &CharacterSnapshot) -> Result<()>;

    fn delete(&self, id: CharacterId) -> Result<()>;

    fn exists(&self, id: CharacterId) -> bool;

    fn list_ids(&self) -> Result<Vec<CharacterId>> {
        Ok(vec![])
    }
}

pub trait InventoryRepository: Send + Sync {
    fn load_slots(&self, id: CharacterId) -> Result<Option<Vec<InventorySlot>>>;

    /// Stores the full slot array; empty slots included.
    fn save_slots(&self, id: CharacterId, slots: &[InventorySlot]) -> Result<()>;

    fn delete_slots(&self, id: CharacterId) -> Result<()>;
}
