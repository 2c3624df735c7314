//! Traits describing read-only game data.
//!
//! Oracles expose item, buff, skill and NPC definitions plus class tables and
//! a randomness source. The [`Env`] aggregate bundles them so rule code can
//! reach everything it needs without coupling to concrete implementations.
mod buffs;
mod error;
mod items;
mod npc;
mod rng;
mod skills;
mod tables;

pub use buffs::{BuffDefinition, BuffOracle};
pub use error::OracleError;
pub use items::{ItemClass, ItemDefinition, ItemOracle, ItemSetDefinition};
pub use npc::{LootEntry, NpcOracle, NpcTemplate};
pub use rng::{PcgRng, RngOracle, ScriptedRng};
pub use skills::{PassiveDefinition, SkillDefinition, SkillKind, SkillOracle};
pub use tables::{ClassBase, TablesOracle};

/// Aggregates the read-only oracles used by the rule modules.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    items: Option<&'a dyn ItemOracle>,
    buffs: Option<&'a dyn BuffOracle>,
    skills: Option<&'a dyn SkillOracle>,
    npcs: Option<&'a dyn NpcOracle>,
    tables: Option<&'a dyn TablesOracle>,
    rng: Option<&'a dyn RngOracle>,
}

impl<'a> Env<'a> {
    pub fn with_all(
        items: &'a dyn ItemOracle,
        buffs: &'a dyn BuffOracle,
        skills: &'a dyn SkillOracle,
        npcs: &'a dyn NpcOracle,
        tables: &'a dyn TablesOracle,
        rng: &'a dyn RngOracle,
    ) -> Self {
        Self {
            items: Some(items),
            buffs: Some(buffs),
            skills: Some(skills),
            npcs: Some(npcs),
            tables: Some(tables),
            rng: Some(rng),
        }
    }

    pub fn empty() -> Self {
        Self {
            items: None,
            buffs: None,
            skills: None,
            npcs: None,
            tables: None,
            rng: None,
        }
    }

    #[must_use]
    pub fn with_items(mut self, items: &'a dyn ItemOracle) -> Self {
        self.items = Some(items);
        self
    }

    #[must_use]
    pub fn with_buffs(mut self, buffs: &'a dyn BuffOracle) -> Self {
        self.buffs = Some(buffs);
        self
    }

    #[must_use]
    pub fn with_skills(mut self, skills: &'a dyn SkillOracle) -> Self {
        self.skills = Some(skills);
        self
    }

    #[must_use]
    pub fn with_npcs(mut self, npcs: &'a dyn NpcOracle) -> Self {
        self.npcs = Some(npcs);
        self
    }

    #[must_use]
    pub fn with_tables(mut self, tables: &'a dyn TablesOracle) -> Self {
        self.tables = Some(tables);
        self
    }

    #[must_use]
    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Returns the ItemOracle, or an error if not available.
    pub fn items(&self) -> Result<&'a dyn ItemOracle, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    pub fn buffs(&self) -> Result<&'a dyn BuffOracle, OracleError> {
        self.buffs.ok_or(OracleError::BuffsNotAvailable)
    }

    pub fn skills(&self) -> Result<&'a dyn SkillOracle, OracleError> {
        self.skills.ok_or(OracleError::SkillsNotAvailable)
    }

    pub fn npcs(&self) -> Result<&'a dyn NpcOracle, OracleError> {
        self.npcs.ok_or(OracleError::NpcsNotAvailable)
    }

    pub fn tables(&self) -> Result<&'a dyn TablesOracle, OracleError> {
        self.tables.ok_or(OracleError::TablesNotAvailable)
    }

    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Looks up an item definition, turning a miss into a lookup error.
    pub fn item(&self, id: crate::state::ItemId) -> Result<ItemDefinition, OracleError> {
        self.items()?
            .definition(id)
            .ok_or(OracleError::UnknownItem(id))
    }

    pub fn buff(&self, id: crate::state::BuffTypeId) -> Result<BuffDefinition, OracleError> {
        self.buffs()?
            .definition(id)
            .ok_or(OracleError::UnknownBuff(id))
    }

    pub fn skill(&self, id: crate::state::SkillId) -> Result<SkillDefinition, OracleError> {
        self.skills()?
            .skill(id)
            .ok_or(OracleError::UnknownSkill(id))
    }
}

impl core::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env")
            .field("items", &self.items.is_some())
            .field("buffs", &self.buffs.is_some())
            .field("skills", &self.skills.is_some())
            .field("npcs", &self.npcs.is_some())
            .field("tables", &self.tables.is_some())
            .field("rng", &self.rng.is_some())
            .finish()
    }
}
