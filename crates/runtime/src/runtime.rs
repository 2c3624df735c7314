//! High-level runtime orchestrator.
//!
//! The runtime owns the shared [`World`] and its background workers and
//! exposes a builder-based API for wiring in oracles, repositories and the
//! outbound broadcaster.

use std::sync::Arc;

use mmo_core::{CharacterId, ConsumableRegistry};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::World;
use crate::api::{Result, RuntimeError};
use crate::clock::{EpochSource, SystemEpoch};
use crate::config::RuntimeConfig;
use crate::events::{Broadcaster, Event, EventBus, Topic};
use crate::live::LiveCharacter;
use crate::oracle::{GameData, NpcSpawn, OracleManager};
use crate::party::{NoParties, PartyDirectory};
use crate::repository::{CharacterRepository, InMemoryCharacterStore, InventoryRepository};
use crate::workers::{DirtySet, PersistenceWorker, RetryPolicy, spawn_visibility};
use crate::world::WorldParts;

/// Main runtime that owns the world and its workers.
pub struct Runtime {
    world: Arc<World>,
    bus: EventBus,
    persistence_task: JoinHandle<()>,
    visibility_task: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Shared world; every player-facing operation is a method on it.
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// Subscribe to one topic of the in-process bus.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn login(&self, id: CharacterId) -> Result<Arc<LiveCharacter>> {
        self.world.login(id)
    }

    pub async fn logout(&self, id: CharacterId) -> Result<()> {
        self.world.logout(id).await
    }

    /// Logs everyone out, cancels pending continuations and joins the
    /// workers. Individual logout failures are logged and do not stop the
    /// shutdown.
    pub async fn shutdown(self) -> Result<()> {
        let online = self.world.characters.ids()?;
        info!(online = online.len(), "runtime shutting down");
        for id in online {
            if let Err(error) = self.world.logout(id).await {
                warn!(character = %id, %error, "logout during shutdown failed");
            }
        }

        let cancelled = self.world.scheduler.shutdown()?;
        self.world.characters.clear()?;
        self.world.npcs.clear()?;
        self.world.drops.clear()?;

        self.world.persistence.shutdown().await?;
        self.persistence_task
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        self.visibility_task.abort();
        match self.visibility_task.await {
            Ok(()) => {}
            Err(error) if error.is_cancelled() => {}
            Err(error) => return Err(RuntimeError::WorkerJoin(error)),
        }

        info!(cancelled, "runtime stopped");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    spawns: Vec<NpcSpawn>,
    character_repo: Option<Arc<dyn CharacterRepository>>,
    inventory_repo: Option<Arc<dyn InventoryRepository>>,
    parties: Option<Arc<dyn PartyDirectory>>,
    epoch: Option<Arc<dyn EpochSource>>,
    broadcaster: Option<Arc<dyn Broadcaster>>,
    consumables: Option<ConsumableRegistry>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            spawns: Vec::new(),
            character_repo: None,
            inventory_repo: None,
            parties: None,
            epoch: None,
            broadcaster: None,
            consumables: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Indexes `data` into oracles and takes over its NPC spawns.
    pub fn game_data(mut self, data: &GameData) -> Self {
        self.oracles = Some(OracleManager::from_data(data));
        self.spawns = data.spawns.clone();
        self
    }

    pub fn spawns(mut self, spawns: Vec<NpcSpawn>) -> Self {
        self.spawns = spawns;
        self
    }

    /// Storage for characters and slots. Defaults to one in-memory store.
    pub fn repositories(
        mut self,
        characters: Arc<dyn CharacterRepository>,
        inventories: Arc<dyn InventoryRepository>,
    ) -> Self {
        self.character_repo = Some(characters);
        self.inventory_repo = Some(inventories);
        self
    }

    pub fn parties(mut self, parties: Arc<dyn PartyDirectory>) -> Self {
        self.parties = Some(parties);
        self
    }

    pub fn epoch(mut self, epoch: Arc<dyn EpochSource>) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// Outbound fan-out. Defaults to the in-process [`EventBus`].
    pub fn broadcaster(mut self, broadcaster: Arc<dyn Broadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    pub fn consumables(mut self, consumables: ConsumableRegistry) -> Self {
        self.consumables = Some(consumables);
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;

        let (character_repo, inventory_repo) = match (self.character_repo, self.inventory_repo) {
            (Some(characters), Some(inventories)) => (characters, inventories),
            _ => {
                let store = Arc::new(InMemoryCharacterStore::new());
                (
                    Arc::clone(&store) as Arc<dyn CharacterRepository>,
                    store as Arc<dyn InventoryRepository>,
                )
            }
        };

        let bus = EventBus::with_capacity(self.config.event_buffer_size);
        let broadcaster = self
            .broadcaster
            .unwrap_or_else(|| Arc::new(bus.clone()) as Arc<dyn Broadcaster>);

        let dirty = Arc::new(DirtySet::new());
        let policy = RetryPolicy {
            attempts: self.config.save_retries,
            backoff: self.config.save_backoff,
        };
        let (worker, persistence) = PersistenceWorker::new(
            Arc::clone(&character_repo),
            Arc::clone(&inventory_repo),
            Arc::clone(&dirty),
            policy,
            self.config.persistence_queue_size,
        );
        let persistence_task = tokio::spawn(worker.run());

        let visibility_interval = self.config.visibility_interval;
        let world = Arc::new(World::new(WorldParts {
            config: self.config,
            oracles,
            consumables: self
                .consumables
                .unwrap_or_else(ConsumableRegistry::with_defaults),
            character_repo,
            inventory_repo,
            parties: self.parties.unwrap_or_else(|| Arc::new(NoParties)),
            epoch: self.epoch.unwrap_or_else(|| Arc::new(SystemEpoch)),
            broadcaster,
            persistence,
            dirty,
        }));

        for spawn in &self.spawns {
            world.spawn_npc(spawn.template, spawn.position)?;
        }
        let visibility_task = spawn_visibility(Arc::downgrade(&world), visibility_interval);

        info!(npcs = world.npcs.len()?, "runtime started");
        Ok(Runtime {
            world,
            bus,
            persistence_task,
            visibility_task,
        })
    }
}
