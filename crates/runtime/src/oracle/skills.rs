//! Skill book implementing [`mmo_core::SkillOracle`].
use std::collections::HashMap;

use mmo_core::{PassiveDefinition, SkillDefinition, SkillId, SkillOracle};

#[derive(Debug, Default)]
pub struct SkillOracleImpl {
    skills: HashMap<SkillId, SkillDefinition>,
    passives: HashMap<SkillId, PassiveDefinition>,
}

impl SkillOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_skill(&mut self, skill: SkillDefinition) {
        self.skills.insert(skill.id, skill);
    }

    pub fn add_passive(&mut self, passive: PassiveDefinition) {
        self.passives.insert(passive.id, passive);
    }
}

impl SkillOracle for SkillOracleImpl {
    fn skill(&self, id: SkillId) -> Option<SkillDefinition> {
        self.skills.get(&id).cloned()
    }

    fn passive(&self, id: SkillId) -> Option<PassiveDefinition> {
        self.passives.get(&id).cloned()
    }
}
