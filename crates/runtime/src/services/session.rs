use std::sync::Arc;

use mmo_core::{
    CharacterId, CharacterRecord, JobClass, NpcInstanceId, NpcOracle, NpcTemplateId, Position,
    StatRecord,
};
use tracing::{info, warn};

use crate::World;
use crate::api::{Result, RuntimeError};
use crate::events::GameEvent;
use crate::live::LiveCharacter;
use crate::repository::CharacterSnapshot;
use crate::workers::{spawn_character_tick, spawn_pet_tick};

impl World {
    /// Loads (or creates) a character, brings it online and starts its
    /// tick task.
    pub fn login(self: &Arc<Self>, id: CharacterId) -> Result<Arc<LiveCharacter>> {
        if self.characters.get(id)?.is_some() {
            return Err(RuntimeError::AlreadyOnline(id));
        }
        let snapshot = match self.character_repo.load(id)? {
            Some(snapshot) => snapshot,
            None => {
                let record = CharacterRecord::new(
                    id,
                    format!("character-{}", id.0),
                    JobClass::default(),
                    self.config.spawn_position,
                );
                let snapshot = CharacterSnapshot::new(record, StatRecord::default());
                self.character_repo.save(&snapshot)?;
                info!(character = %id, "character created");
                snapshot
            }
        };

        let live = self.characters.register(snapshot)?;
        if let Some(stats) = self.refresh_stats(&live)?
            && live.vitals().hp() == 0
        {
            live.vitals().refill(stats.max_hp, stats.max_chi);
        }
        // Login itself is not a change worth saving.
        live.take_dirty();

        spawn_character_tick(self, &live)?;
        let summoned = live
            .inventory(self.inventory_repo())?
            .pet()
            .is_some_and(|pet| pet.summoned);
        if summoned {
            spawn_pet_tick(self, &live)?;
        }

        info!(character = %id, name = live.name(), pseudo = %live.pseudo(), "character logged in");
        self.publish_owner(id, GameEvent::LoggedIn { character: id });
        Ok(live)
    }

    /// Takes a character offline and writes it out, waiting for the save.
    pub async fn logout(&self, id: CharacterId) -> Result<()> {
        let Some(live) = self.characters.remove(id)? else {
            return Err(RuntimeError::UnknownCharacter(id));
        };
        live.go_offline()?;
        self.end_duel(&live)?;
        live.sight().clear()?;
        self.dirty.take(id)?;

        let request = self.persist_request(&live)?;
        self.persistence.flush(request).await?;

        info!(character = %id, "character logged out");
        self.publish_owner(id, GameEvent::LoggedOut { character: id });
        Ok(())
    }

    /// Spawns an NPC from its template at `position`.
    pub fn spawn_npc(&self, id: NpcTemplateId, position: Position) -> Result<Option<NpcInstanceId>> {
        let Some(template) = self.oracles.npcs.template(id) else {
            warn!(template = ?id, "unknown npc template, nothing spawned");
            return Ok(None);
        };
        let npc = self.npcs.spawn(template, position)?;
        Ok(Some(npc.id()))
    }
}
