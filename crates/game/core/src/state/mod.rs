//! Identifiers and persisted records of characters and world entities.
//!
//! Live, lock-guarded wrappers around these records live in the runtime; the
//! types here are plain data.
mod character;
mod common;
mod life;

pub use character::{CharacterFlags, CharacterRecord, Faction, JobClass, LearnedSkill};
pub use common::{
    BuffTypeId, CharacterId, DropId, Epoch, ItemId, MapId, NpcInstanceId, NpcTemplateId, Position,
    PseudoId, SkillId, Tick,
};
pub use life::LifeState;
