//! In-memory oracles shared by unit tests.

use std::collections::HashMap;

use crate::env::{
    BuffDefinition, BuffOracle, ClassBase, Env, ItemDefinition, ItemOracle, ItemSetDefinition,
    NpcOracle, NpcTemplate, PassiveDefinition, PcgRng, SkillDefinition, SkillOracle,
    TablesOracle,
};
use crate::state::{BuffTypeId, ItemId, JobClass, NpcTemplateId, SkillId};

pub const CLASS_BASE: ClassBase = ClassBase::new(100, 10, 50, 5, 1_000);

#[derive(Debug)]
pub struct TestData {
    items: HashMap<ItemId, ItemDefinition>,
    stones: HashMap<u8, ItemDefinition>,
    sets: Vec<ItemSetDefinition>,
    buffs: HashMap<BuffTypeId, BuffDefinition>,
    skills: HashMap<SkillId, SkillDefinition>,
    passives: HashMap<SkillId, PassiveDefinition>,
    npcs: HashMap<NpcTemplateId, NpcTemplate>,
    rng: PcgRng,
}

impl Default for TestData {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            stones: HashMap::new(),
            sets: Vec::new(),
            buffs: HashMap::new(),
            skills: HashMap::new(),
            passives: HashMap::new(),
            npcs: HashMap::new(),
            rng: PcgRng::new(7),
        }
    }
}

impl TestData {
    pub fn add_item(&mut self, definition: ItemDefinition) {
        self.items.insert(definition.id, definition);
    }

    pub fn add_stone(&mut self, code: u8, definition: ItemDefinition) {
        self.stones.insert(code, definition);
    }

    pub fn add_set(&mut self, set: ItemSetDefinition) {
        self.sets.push(set);
    }

    pub fn add_buff(&mut self, definition: BuffDefinition) {
        self.buffs.insert(definition.id, definition);
    }

    pub fn add_skill(&mut self, definition: SkillDefinition) {
        self.skills.insert(definition.id, definition);
    }

    pub fn add_passive(&mut self, definition: PassiveDefinition) {
        self.passives.insert(definition.id, definition);
    }

    pub fn add_npc(&mut self, template: NpcTemplate) {
        self.npcs.insert(template.id, template);
    }

    pub fn env(&self) -> Env<'_> {
        Env::with_all(self, self, self, self, self, &self.rng)
    }
}

impl ItemOracle for TestData {
    fn definition(&self, id: ItemId) -> Option<ItemDefinition> {
        self.items.get(&id).cloned()
    }

    fn stone(&self, code: u8) -> Option<ItemDefinition> {
        self.stones.get(&code).cloned()
    }

    fn sets(&self) -> &[ItemSetDefinition] {
        &self.sets
    }
}

impl BuffOracle for TestData {
    fn definition(&self, id: BuffTypeId) -> Option<BuffDefinition> {
        self.buffs.get(&id).cloned()
    }
}

impl SkillOracle for TestData {
    fn skill(&self, id: SkillId) -> Option<SkillDefinition> {
        self.skills.get(&id).cloned()
    }

    fn passive(&self, id: SkillId) -> Option<PassiveDefinition> {
        self.passives.get(&id).cloned()
    }
}

impl NpcOracle for TestData {
    fn template(&self, id: NpcTemplateId) -> Option<NpcTemplate> {
        self.npcs.get(&id).cloned()
    }
}

impl TablesOracle for TestData {
    fn class_base(&self, _class: JobClass) -> Option<ClassBase> {
        Some(CLASS_BASE)
    }

    fn exp_to_next(&self, level: u16) -> Option<u64> {
        (level < 100).then(|| u64::from(level) * 100)
    }
}
