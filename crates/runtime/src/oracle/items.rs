//! Item catalogue implementing [`mmo_core::ItemOracle`].
use std::collections::HashMap;

use mmo_core::{ItemClass, ItemDefinition, ItemId, ItemOracle, ItemSetDefinition};

/// ItemOracle implementation with static item definitions.
///
/// Stones are ordinary items of class [`ItemClass::Stone`]; they are also
/// indexed by their code for upgrade and socket lookups.
#[derive(Debug, Default)]
pub struct ItemOracleImpl {
    definitions: HashMap<ItemId, ItemDefinition>,
    stones: HashMap<u8, ItemId>,
    sets: Vec<ItemSetDefinition>,
}

impl ItemOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item definition
    pub fn add_definition(&mut self, def: ItemDefinition) {
        if let ItemClass::Stone { code } = def.class {
            self.stones.insert(code, def.id);
        }
        self.definitions.insert(def.id, def);
    }

    pub fn add_set(&mut self, set: ItemSetDefinition) {
        self.sets.push(set);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl ItemOracle for ItemOracleImpl {
    fn definition(&self, id: ItemId) -> Option<ItemDefinition> {
        self.definitions.get(&id).cloned()
    }

    fn stone(&self, code: u8) -> Option<ItemDefinition> {
        self.stones
            .get(&code)
            .and_then(|id| self.definitions.get(id))
            .cloned()
    }

    fn sets(&self) -> &[ItemSetDefinition] {
        &self.sets
    }
}
