use std::collections::HashSet;
use std::sync::RwLock;

use mmo_core::{CharacterId, DropId, NpcInstanceId};

use super::{read, write};
use crate::api::Result;

/// Entities currently near a character.
///
/// Rebuilt wholesale by the visibility task; read by event fan-out.
#[derive(Debug, Default)]
pub struct OnSight {
    players: RwLock<HashSet<CharacterId>>,
    npcs: RwLock<HashSet<NpcInstanceId>>,
    drops: RwLock<HashSet<DropId>>,
}

impl OnSight {
    pub fn replace(
        &self,
        players: HashSet<CharacterId>,
        npcs: HashSet<NpcInstanceId>,
        drops: HashSet<DropId>,
    ) -> Result<()> {
        *write(&self.players)? = players;
        *write(&self.npcs)? = npcs;
        *write(&self.drops)? = drops;
        Ok(())
    }

    pub fn players(&self) -> Result<Vec<CharacterId>> {
        let mut players: Vec<_> = read(&self.players)?.iter().copied().collect();
        players.sort();
        Ok(players)
    }

    pub fn sees_player(&self, id: CharacterId) -> Result<bool> {
        Ok(read(&self.players)?.contains(&id))
    }

    pub fn sees_npc(&self, id: NpcInstanceId) -> Result<bool> {
        Ok(read(&self.npcs)?.contains(&id))
    }

    pub fn sees_drop(&self, id: DropId) -> Result<bool> {
        Ok(read(&self.drops)?.contains(&id))
    }

    pub fn clear(&self) -> Result<()> {
        self.replace(HashSet::new(), HashSet::new(), HashSet::new())
    }
}
