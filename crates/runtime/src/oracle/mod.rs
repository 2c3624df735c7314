//! Runtime wrappers around static game content oracles.
//!
//! These implementations expose `mmo-core` oracle traits and bundle them into
//! an [`OracleManager`] so the runtime can build [`mmo_core::Env`] snapshots
//! on demand. The data is immutable at runtime; dynamic state lives in the
//! registries.
mod buffs;
mod data;
mod items;
mod npc;
mod rng;
mod skills;
mod tables;

use std::sync::Arc;

use mmo_core::{Env, RngOracle};

pub use buffs::BuffOracleImpl;
pub use data::{GameData, NpcSpawn};
pub use items::ItemOracleImpl;
pub use npc::NpcOracleImpl;
pub use rng::SystemRng;
pub use skills::SkillOracleImpl;
pub use tables::TablesOracleImpl;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) items: Arc<ItemOracleImpl>,
    pub(crate) buffs: Arc<BuffOracleImpl>,
    pub(crate) skills: Arc<SkillOracleImpl>,
    pub(crate) npcs: Arc<NpcOracleImpl>,
    pub(crate) tables: Arc<TablesOracleImpl>,
    pub(crate) rng: Arc<dyn RngOracle>,
}

impl OracleManager {
    /// Indexes `data` with an OS-seeded generator.
    pub fn from_data(data: &GameData) -> Self {
        Self::with_rng(data, Arc::new(SystemRng::new()))
    }

    /// Indexes `data` with the given generator; tests pass a seeded one.
    pub fn with_rng(data: &GameData, rng: Arc<dyn RngOracle>) -> Self {
        let mut items = ItemOracleImpl::new();
        for item in &data.items {
            items.add_definition(item.clone());
        }
        for set in &data.sets {
            items.add_set(set.clone());
        }

        let mut buffs = BuffOracleImpl::new();
        for buff in &data.buffs {
            buffs.add_definition(buff.clone());
        }

        let mut skills = SkillOracleImpl::new();
        for skill in &data.skills {
            skills.add_skill(skill.clone());
        }
        for passive in &data.passives {
            skills.add_passive(passive.clone());
        }

        let mut npcs = NpcOracleImpl::new();
        for template in &data.npcs {
            npcs.add_template(template.clone());
        }

        let tables = TablesOracleImpl::new(data.classes.clone(), data.exp_table.clone());

        Self {
            items: Arc::new(items),
            buffs: Arc::new(buffs),
            skills: Arc::new(skills),
            npcs: Arc::new(npcs),
            tables: Arc::new(tables),
            rng,
        }
    }

    /// Borrows every oracle as an [`Env`] for the core rules.
    pub fn env(&self) -> Env<'_> {
        Env::with_all(
            self.items.as_ref(),
            self.buffs.as_ref(),
            self.skills.as_ref(),
            self.npcs.as_ref(),
            self.tables.as_ref(),
            self.rng.as_ref(),
        )
    }

    pub fn rng(&self) -> &dyn RngOracle {
        self.rng.as_ref()
    }
}

impl std::fmt::Debug for OracleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleManager")
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}
