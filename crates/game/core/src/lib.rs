//! Deterministic character rules shared by the runtime and offline tools.
//!
//! `mmo-core` owns the data model of a live character and the pure
//! operations on it: the 450-slot inventory store, the buff lifecycle, the
//! stat aggregation pipeline, combat math, consumable effects and levelling.
//! Nothing here performs I/O, spawns tasks or logs; static data arrives
//! through the oracle traits in [`env`] and every operation returns a
//! structured outcome or a [`Rejection`].
pub mod buff;
pub mod combat;
pub mod config;
pub mod consumable;
pub mod env;
pub mod error;
pub mod inventory;
pub mod progression;
pub mod state;
pub mod stats;

#[cfg(test)]
mod testkit;

pub use buff::{Buff, BuffSet, BuffSpecial, Clock, ClockKind, ClockReading, GrantOutcome};
pub use combat::{
    AttackOutcome, AttackResult, AttackerProfile, DefenderProfile, HitKind, apply_damage,
    resolve_attack,
};
pub use config::GameConfig;
pub use consumable::{
    ConsumableEffect, ConsumableRegistry, ConsumableTag, ConsumeContext, ConsumeOutcome,
    UseOutcome, Vitals, use_item,
};
pub use env::{
    BuffDefinition, BuffOracle, ClassBase, Env, ItemClass, ItemDefinition, ItemOracle,
    ItemSetDefinition, LootEntry, NpcOracle, NpcTemplate, OracleError, PassiveDefinition, PcgRng,
    RngOracle, SkillDefinition, SkillKind, SkillOracle, TablesOracle,
};
pub use error::{ActionError, ErrorSeverity, GameError, Rejection};
pub use inventory::{
    Inventory, InventorySlot, PetRecord, SlotContext, SlotIndex, SlotRange, StorageMode,
};
pub use progression::{LevelUp, gain_exp};
pub use state::{
    BuffTypeId, CharacterFlags, CharacterId, CharacterRecord, DropId, Epoch, Faction, ItemId,
    JobClass, LearnedSkill, LifeState, MapId, NpcInstanceId, NpcTemplateId, Position, PseudoId,
    SkillId, Tick,
};
pub use stats::{DerivedStats, StatDelta, StatInputs, StatRecord, recalculate};
