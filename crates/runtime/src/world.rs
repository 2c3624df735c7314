//! Shared live state of one server process.
//!
//! [`World`] bundles the registries, static data, repositories and outbound
//! channels that every service needs. Player-facing operations are methods
//! on it, grouped by concern under `services/`.

use std::sync::Arc;

use mmo_core::{CharacterId, ConsumableRegistry, Env, Epoch, Position};
use tracing::warn;

use crate::api::Result;
use crate::clock::EpochSource;
use crate::config::RuntimeConfig;
use crate::events::{Broadcaster, Event, GameEvent};
use crate::live::LiveCharacter;
use crate::oracle::OracleManager;
use crate::party::PartyDirectory;
use crate::registry::{CharacterRegistry, DropRegistry, NpcRegistry};
use crate::repository::{CharacterRepository, InventoryRepository};
use crate::workers::{DirtySet, PersistRequest, PersistenceHandle, Scheduler};

pub struct World {
    pub(crate) config: RuntimeConfig,
    pub(crate) oracles: OracleManager,
    pub(crate) consumables: ConsumableRegistry,

    pub(crate) characters: CharacterRegistry,
    pub(crate) npcs: NpcRegistry,
    pub(crate) drops: DropRegistry,

    pub(crate) character_repo: Arc<dyn CharacterRepository>,
    pub(crate) inventory_repo: Arc<dyn InventoryRepository>,
    pub(crate) parties: Arc<dyn PartyDirectory>,
    pub(crate) epoch: Arc<dyn EpochSource>,
    pub(crate) broadcaster: Arc<dyn Broadcaster>,

    pub(crate) persistence: PersistenceHandle,
    pub(crate) dirty: Arc<DirtySet>,
    pub(crate) scheduler: Scheduler,
}

/// Collaborators handed to [`World::new`] by the runtime builder.
pub(crate) struct WorldParts {
    pub config: RuntimeConfig,
    pub oracles: OracleManager,
    pub consumables: ConsumableRegistry,
    pub character_repo: Arc<dyn CharacterRepository>,
    pub inventory_repo: Arc<dyn InventoryRepository>,
    pub parties: Arc<dyn PartyDirectory>,
    pub epoch: Arc<dyn EpochSource>,
    pub broadcaster: Arc<dyn Broadcaster>,
    pub persistence: PersistenceHandle,
    pub dirty: Arc<DirtySet>,
}

impl World {
    pub(crate) fn new(parts: WorldParts) -> Self {
        Self {
            config: parts.config,
            oracles: parts.oracles,
            consumables: parts.consumables,
            characters: CharacterRegistry::new(),
            npcs: NpcRegistry::new(),
            drops: DropRegistry::new(),
            character_repo: parts.character_repo,
            inventory_repo: parts.inventory_repo,
            parties: parts.parties,
            epoch: parts.epoch,
            broadcaster: parts.broadcaster,
            persistence: parts.persistence,
            dirty: parts.dirty,
            scheduler: Scheduler::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn characters(&self) -> &CharacterRegistry {
        &self.characters
    }

    pub fn npcs(&self) -> &NpcRegistry {
        &self.npcs
    }

    pub fn drops(&self) -> &DropRegistry {
        &self.drops
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn dirty(&self) -> &DirtySet {
        &self.dirty
    }

    pub fn now(&self) -> Epoch {
        self.epoch.now()
    }

    pub(crate) fn env(&self) -> Env<'_> {
        self.oracles.env()
    }

    pub(crate) fn inventory_repo(&self) -> &dyn InventoryRepository {
        self.inventory_repo.as_ref()
    }

    // ===== fan-out =====

    pub(crate) fn publish_owner(&self, character: CharacterId, payload: GameEvent) {
        self.broadcaster.publish(Event::owner(character, payload));
    }

    /// Publishes to `live` and everyone on its sight list.
    pub(crate) fn publish_near(&self, live: &LiveCharacter, payload: GameEvent) -> Result<()> {
        let mut observers = live.sight().players()?;
        observers.insert(0, live.id());
        self.broadcaster.publish(Event::near(observers, payload));
        Ok(())
    }

    /// Publishes to every online character within sight of `position`.
    pub(crate) fn publish_at(&self, position: &Position, payload: GameEvent) -> Result<()> {
        let mut observers = Vec::new();
        for live in self.characters.all()? {
            if live.record()?.position.within(position, self.config.visibility_radius) {
                observers.push(live.id());
            }
        }
        observers.sort();
        self.broadcaster.publish(Event::near(observers, payload));
        Ok(())
    }

    // ===== write-behind =====

    pub(crate) fn persist_request(&self, live: &LiveCharacter) -> Result<PersistRequest> {
        Ok(PersistRequest {
            snapshot: live.snapshot()?,
            slots: live.loaded_slots()?,
        })
    }

    /// Queues a background save; a full queue marks the character dirty
    /// for its next tick.
    pub(crate) fn schedule_save(&self, live: &LiveCharacter) -> Result<()> {
        let request = self.persist_request(live)?;
        if !self.persistence.enqueue(request) {
            warn!(character = %live.id(), "persistence queue full, deferring save");
            self.dirty.insert(live.id())?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("oracles", &self.oracles)
            .field("characters", &self.characters)
            .finish_non_exhaustive()
    }
}
