//! Buff-type catalogue implementing [`mmo_core::BuffOracle`].
use std::collections::HashMap;

use mmo_core::{BuffDefinition, BuffOracle, BuffTypeId};

#[derive(Debug, Default)]
pub struct BuffOracleImpl {
    definitions: HashMap<BuffTypeId, BuffDefinition>,
}

impl BuffOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_definition(&mut self, def: BuffDefinition) {
        self.definitions.insert(def.id, def);
    }
}

impl BuffOracle for BuffOracleImpl {
    fn definition(&self, id: BuffTypeId) -> Option<BuffDefinition> {
        self.definitions.get(&id).cloned()
    }
}
