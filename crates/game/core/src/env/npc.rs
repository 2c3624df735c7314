use crate::state::{ItemId, NpcTemplateId};

/// Read-only NPC template catalogue.
pub trait NpcOracle: Send + Sync {
    fn template(&self, id: NpcTemplateId) -> Option<NpcTemplate>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcTemplate {
    pub id: NpcTemplateId,
    pub level: u16,
    pub max_hp: u32,
    /// Template defense, added on top of the level-scaled defense.
    pub defense: u32,
    pub dodge: u32,
    pub exp: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot: Vec<LootEntry>,
    /// Respawn delay window in seconds, inclusive.
    pub respawn_secs: (u64, u64),
}

impl NpcTemplate {
    pub fn new(id: NpcTemplateId, level: u16, max_hp: u32) -> Self {
        Self {
            id,
            level,
            max_hp,
            defense: 0,
            dodge: 0,
            exp: 0,
            loot: Vec::new(),
            respawn_secs: (30, 60),
        }
    }

    #[must_use]
    pub fn with_exp(mut self, exp: u64) -> Self {
        self.exp = exp;
        self
    }

    #[must_use]
    pub fn with_loot(mut self, loot: Vec<LootEntry>) -> Self {
        self.loot = loot;
        self
    }

    #[must_use]
    pub fn with_respawn(mut self, min_secs: u64, max_secs: u64) -> Self {
        self.respawn_secs = (min_secs, max_secs.max(min_secs));
        self
    }
}

/// One roll on an NPC loot table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item: ItemId,
    pub quantity: u32,
    /// Drop chance in percent.
    pub chance_pct: u32,
}

impl LootEntry {
    pub const fn new(item: ItemId, quantity: u32, chance_pct: u32) -> Self {
        Self {
            item,
            quantity,
            chance_pct,
        }
    }
}
