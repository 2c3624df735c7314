#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use mmo_core::env::ScriptedRng;
use mmo_core::{
    BuffDefinition, BuffSpecial, BuffTypeId, CharacterId, ClassBase, ClockKind, ConsumableTag,
    GameConfig, ItemClass, ItemDefinition, ItemId, JobClass, LootEntry, NpcTemplate,
    NpcTemplateId, Position, SkillDefinition, SkillId, SkillKind, StatDelta,
};
use mmo_runtime::{
    CharacterRepository, GameData, InMemoryCharacterStore, InventoryRepository, ManualEpoch,
    NpcSpawn, OracleManager, Runtime, RuntimeBuilder, RuntimeConfig,
};

pub const SWORD: ItemId = ItemId(1);
pub const DAGGER: ItemId = ItemId(2);
pub const CLEAVER: ItemId = ItemId(3);
pub const POTION: ItemId = ItemId(10);
pub const HERB: ItemId = ItemId(100);
pub const FANG: ItemId = ItemId(200);
/// Dropped by its carrier on death.
pub const FLAG: ItemId = ItemId(300);
pub const CRATE: ItemId = ItemId(301);
/// Three-tick buff item worth 30 max HP while activated.
pub const CHARM: ItemId = ItemId(302);

pub const VIGOR: BuffTypeId = BuffTypeId(1);
/// Strength and a defense percentage, so its grant feeds derived formulas.
pub const MIGHT: BuffTypeId = BuffTypeId(2);
/// Lost on death.
pub const WARD: BuffTypeId = BuffTypeId(3);
pub const VENOM: BuffTypeId = BuffTypeId(4);
pub const STUN: BuffTypeId = BuffTypeId(5);
pub const DAZE: BuffTypeId = BuffTypeId(6);

pub const BLESS: SkillId = SkillId(1);
/// Arts strike that always paralyses on a hit.
pub const STING: SkillId = SkillId(2);
pub const GOBLIN: NpcTemplateId = NpcTemplateId(1);

pub fn game_data() -> GameData {
    let weapon = |id, atk| {
        ItemDefinition::new(id, ItemClass::Equipment { slot: 3 }).with_stats(StatDelta {
            min_atk: atk,
            max_atk: atk,
            ..StatDelta::ZERO
        })
    };

    GameData {
        items: vec![
            weapon(SWORD, 10),
            weapon(DAGGER, 40),
            weapon(CLEAVER, 999),
            ItemDefinition::new(
                POTION,
                ItemClass::Consumable {
                    tag: ConsumableTag::HealHp,
                    magnitude: 50,
                    buff: None,
                },
            )
            .stackable()
            .with_price(20),
            ItemDefinition::new(HERB, ItemClass::Material)
                .stackable()
                .with_price(4),
            ItemDefinition::new(FANG, ItemClass::Material).stackable(),
            ItemDefinition::new(FLAG, ItemClass::Quest),
            ItemDefinition::new(CRATE, ItemClass::Box),
            ItemDefinition::new(CHARM, ItemClass::BuffItem { duration_secs: 3 }).with_stats(
                StatDelta {
                    max_hp: 30,
                    ..StatDelta::ZERO
                },
            ),
        ],
        buffs: vec![
            BuffDefinition::new(VIGOR, ClockKind::CharacterTick, 600).with_delta(StatDelta {
                max_hp: 100,
                ..StatDelta::ZERO
            }),
            BuffDefinition::new(MIGHT, ClockKind::CharacterTick, 10).with_delta(StatDelta {
                str: 50,
                def_pct: 50,
                ..StatDelta::ZERO
            }),
            BuffDefinition::new(WARD, ClockKind::CharacterTick, 600).with_delta(StatDelta {
                defense: 25,
                ..StatDelta::ZERO
            }),
            BuffDefinition::new(VENOM, ClockKind::CharacterTick, 30)
                .with_special(BuffSpecial::Poison { damage: 10_000 }),
            BuffDefinition::new(STUN, ClockKind::CharacterTick, 5)
                .with_special(BuffSpecial::Paralysis),
            BuffDefinition::new(DAZE, ClockKind::CharacterTick, 5)
                .with_special(BuffSpecial::Confusion),
        ],
        skills: vec![
            SkillDefinition {
                id: BLESS,
                chi_cost: 0,
                kind: SkillKind::Buff { buff: VIGOR },
            },
            SkillDefinition {
                id: STING,
                chi_cost: 5,
                kind: SkillKind::Attack {
                    multiplier_pct: 100,
                    inflicts: Some(STUN),
                    chance_pct: 100,
                },
            },
        ],
        npcs: vec![
            NpcTemplate::new(GOBLIN, 1, 10)
                .with_exp(50)
                .with_loot(vec![LootEntry::new(FANG, 1, 100)])
                .with_respawn(30, 60),
        ],
        classes: HashMap::from([(JobClass::Novice, ClassBase::new(100, 10, 50, 5, 1_000))]),
        exp_table: vec![100, 200, 300],
        spawns: vec![NpcSpawn {
            template: GOBLIN,
            position: spawn_point(),
        }],
        ..GameData::default()
    }
}

pub fn spawn_point() -> Position {
    RuntimeConfig::default().spawn_position
}

/// Ticks are driven by hand in these tests; the background tick never
/// fires within a test's lifetime.
pub fn config() -> RuntimeConfig {
    RuntimeConfig {
        tick_interval: Duration::from_secs(3_600),
        visibility_interval: Duration::from_secs(3_600),
        game: GameConfig {
            death_expired_buffs: vec![WARD],
            flag_item_ids: vec![FLAG],
            ..GameConfig::default()
        },
        ..RuntimeConfig::default()
    }
}

pub async fn runtime_with_store(store: Arc<InMemoryCharacterStore>) -> Runtime {
    runtime_with_store_dyn(
        Arc::clone(&store) as Arc<dyn CharacterRepository>,
        store as Arc<dyn InventoryRepository>,
    )
    .await
}

fn builder(
    characters: Arc<dyn CharacterRepository>,
    inventories: Arc<dyn InventoryRepository>,
) -> RuntimeBuilder {
    let data = game_data();
    // Every roll comes up 1: hits land, chances succeed, ranges pick their minimum.
    let oracles = OracleManager::with_rng(&data, Arc::new(ScriptedRng::new(vec![0])));
    Runtime::builder()
        .config(config())
        .oracles(oracles)
        .spawns(data.spawns.clone())
        .repositories(characters, inventories)
}

pub async fn runtime_with_store_dyn(
    characters: Arc<dyn CharacterRepository>,
    inventories: Arc<dyn InventoryRepository>,
) -> Runtime {
    builder(characters, inventories)
        .build()
        .await
        .expect("runtime builds")
}

/// A runtime whose server clock only moves when `epoch` is advanced.
pub async fn runtime_at(epoch: Arc<ManualEpoch>) -> Runtime {
    let store = Arc::new(InMemoryCharacterStore::new());
    builder(
        Arc::clone(&store) as Arc<dyn CharacterRepository>,
        store as Arc<dyn InventoryRepository>,
    )
    .epoch(epoch)
    .build()
    .await
    .expect("runtime builds")
}

pub async fn runtime() -> Runtime {
    runtime_with_store(Arc::new(InMemoryCharacterStore::new())).await
}

pub fn character(id: u32) -> CharacterId {
    CharacterId(id)
}
