use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use mmo_core::{NpcInstanceId, NpcTemplate, Position};

use crate::api::Result;
use crate::live::{LiveNpc, read, write};

/// Spawned NPC instances.
#[derive(Debug, Default)]
pub struct NpcRegistry {
    npcs: RwLock<HashMap<NpcInstanceId, Arc<LiveNpc>>>,
    next_id: AtomicU32,
}

impl NpcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&self, template: NpcTemplate, position: Position) -> Result<Arc<LiveNpc>> {
        let id = NpcInstanceId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let npc = Arc::new(LiveNpc::new(id, template, position));
        write(&self.npcs)?.insert(id, Arc::clone(&npc));
        Ok(npc)
    }

    pub fn get(&self, id: NpcInstanceId) -> Result<Option<Arc<LiveNpc>>> {
        Ok(read(&self.npcs)?.get(&id).cloned())
    }

    pub fn remove(&self, id: NpcInstanceId) -> Result<Option<Arc<LiveNpc>>> {
        Ok(write(&self.npcs)?.remove(&id))
    }

    pub fn all(&self) -> Result<Vec<Arc<LiveNpc>>> {
        Ok(read(&self.npcs)?.values().cloned().collect())
    }

    /// NPCs within `radius` of `center`, dead ones included.
    pub fn near(&self, center: &Position, radius: u32) -> Result<Vec<Arc<LiveNpc>>> {
        Ok(read(&self.npcs)?
            .values()
            .filter(|npc| npc.position().within(center, radius))
            .cloned()
            .collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(read(&self.npcs)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&self) -> Result<()> {
        write(&self.npcs)?.clear();
        Ok(())
    }
}
