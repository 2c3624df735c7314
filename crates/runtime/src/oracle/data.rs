//! Static game data as loaded from definition files.
use std::collections::{HashMap, HashSet};
use std::path::Path;

use mmo_core::{
    BuffDefinition, ClassBase, ItemDefinition, ItemSetDefinition, JobClass, NpcTemplate,
    NpcTemplateId, PassiveDefinition, Position, SkillDefinition,
};
use serde::{Deserialize, Serialize};

use crate::api::RuntimeError;

/// An NPC placed into the world at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub template: NpcTemplateId,
    pub position: Position,
}

/// Every read-only table the engine consults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameData {
    pub items: Vec<ItemDefinition>,
    pub sets: Vec<ItemSetDefinition>,
    pub buffs: Vec<BuffDefinition>,
    pub skills: Vec<SkillDefinition>,
    pub passives: Vec<PassiveDefinition>,
    pub npcs: Vec<NpcTemplate>,
    pub classes: HashMap<JobClass, ClassBase>,
    /// Experience needed to leave level `index + 1`.
    pub exp_table: Vec<u64>,
    pub spawns: Vec<NpcSpawn>,
}

impl GameData {
    pub fn from_ron_str(source: &str) -> Result<Self, RuntimeError> {
        let data: Self =
            ron::from_str(source).map_err(|e| RuntimeError::InvalidGameData(e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    pub fn from_json_str(source: &str) -> Result<Self, RuntimeError> {
        let data: Self = serde_json::from_str(source)
            .map_err(|e| RuntimeError::InvalidGameData(e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    /// Reads a `.ron` or `.json` file, chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| RuntimeError::InvalidGameData(format!("{}: {e}", path.display())))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            _ => Self::from_ron_str(&source),
        }
    }

    /// Rejects duplicate ids and spawns of unknown templates.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        unique("item", self.items.iter().map(|item| item.id.0))?;
        unique("buff", self.buffs.iter().map(|buff| buff.id.0))?;
        unique("skill", self.skills.iter().map(|skill| skill.id.0))?;
        unique("passive", self.passives.iter().map(|passive| passive.id.0))?;
        unique("npc template", self.npcs.iter().map(|npc| npc.id.0))?;
        unique(
            "stone code",
            self.items.iter().filter_map(|item| match item.class {
                mmo_core::ItemClass::Stone { code } => Some(u32::from(code)),
                _ => None,
            }),
        )?;

        let templates: HashSet<NpcTemplateId> = self.npcs.iter().map(|npc| npc.id).collect();
        if let Some(spawn) = self
            .spawns
            .iter()
            .find(|spawn| !templates.contains(&spawn.template))
        {
            return Err(RuntimeError::InvalidGameData(format!(
                "spawn references unknown npc template {}",
                spawn.template.0
            )));
        }
        Ok(())
    }
}

fn unique(kind: &str, ids: impl Iterator<Item = u32>) -> Result<(), RuntimeError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(RuntimeError::InvalidGameData(format!(
                "duplicate {kind} id {id}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"(
        items: [
            (
                id: ItemId(100),
                class: Consumable(tag: HealHp, magnitude: 50, buff: None),
                stackable: true,
                bankable: true,
                tradable: true,
                price: 20,
            ),
            (
                id: ItemId(900),
                class: Stone(code: 1),
                stackable: false,
                bankable: true,
                tradable: true,
                price: 0,
                stats: (defense: 4),
            ),
        ],
        classes: {
            Warrior: (base_hp: 120, hp_per_level: 12, base_chi: 40, chi_per_level: 3, base_attack_speed: 1000),
        },
        exp_table: [100, 250, 500],
    )"#;

    #[test]
    fn parses_ron() {
        let data = GameData::from_ron_str(SAMPLE).unwrap();
        assert_eq!(data.items.len(), 2);
        assert_eq!(data.items[1].stats.defense, 4);
        assert_eq!(data.exp_table, vec![100, 250, 500]);
        assert!(data.classes.contains_key(&JobClass::Warrior));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut data = GameData::from_ron_str(SAMPLE).unwrap();
        data.items.push(data.items[0].clone());
        assert!(matches!(
            data.validate(),
            Err(RuntimeError::InvalidGameData(_))
        ));
    }

    #[test]
    fn unknown_spawn_template_is_rejected() {
        let mut data = GameData::default();
        data.spawns.push(NpcSpawn {
            template: NpcTemplateId(7),
            position: Position::default(),
        });
        assert!(data.validate().is_err());
    }
}
