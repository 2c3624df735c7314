//! NPC templates implementing [`mmo_core::NpcOracle`].
use std::collections::HashMap;

use mmo_core::{NpcOracle, NpcTemplate, NpcTemplateId};

/// NpcOracle implementation with static NPC templates
#[derive(Debug, Default)]
pub struct NpcOracleImpl {
    templates: HashMap<NpcTemplateId, NpcTemplate>,
}

impl NpcOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an NPC template
    pub fn add_template(&mut self, template: NpcTemplate) {
        self.templates.insert(template.id, template);
    }
}

impl NpcOracle for NpcOracleImpl {
    fn template(&self, id: NpcTemplateId) -> Option<NpcTemplate> {
        self.templates.get(&id).cloned()
    }
}
