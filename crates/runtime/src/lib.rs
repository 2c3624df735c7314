//! Concurrent character runtime for the game server.
//!
//! This crate keeps every online character in memory behind its own set of
//! fine-grained locks and applies the rules from `mmo-core` to it: inventory
//! mutations, consumables, buffs, stat recomputation, combat, deaths and
//! respawns. State changes are published as semantic [`Event`]s and written
//! behind to pluggable repositories.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`World`] is the shared state; player-facing operations are its methods
//! - [`live`] and [`registry`] hold the per-character and per-NPC live state
//! - [`api`] exposes the result and error types clients interact with
//! - [`events`] provides the topic-based event bus and broadcaster seam
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod clock;
pub mod config;
pub mod events;
pub mod live;
pub mod oracle;
pub mod party;
pub mod registry;
pub mod repository;
pub mod runtime;

mod services;
mod workers;
mod world;

pub use api::{ActionResult, Result, RuntimeError};
pub use clock::{EpochSource, ManualEpoch, SystemEpoch};
pub use config::RuntimeConfig;
pub use events::{Broadcaster, Combatant, Event, EventBus, GameEvent, Scope, Topic};
pub use live::{LiveCharacter, LiveNpc};
pub use oracle::{GameData, NpcSpawn, OracleManager};
pub use party::{DistributionMode, InMemoryParties, NoParties, PartyDirectory};
pub use registry::{CharacterRegistry, DropRegistry, GroundDrop, NpcRegistry};
pub use repository::{
    CharacterRepository, CharacterSnapshot, FileCharacterStore, InMemoryCharacterStore,
    InventoryRepository, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use workers::{DirtySet, PersistRequest, PersistenceHandle, RetryPolicy, Scheduler};
pub use world::World;
