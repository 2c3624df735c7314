//! Full stat recalculation.
//!
//! ```text
//! base record + class table
//!   → Σ buff deltas (poison skipped)
//!   → Σ job passives × level
//!   → Σ equipped items, stones, set bonuses
//!   → derived formulas, % increases, injury penalty, clamps
//! ```
//!
//! [`recalculate`] is pure: the same inputs always give the same output, so
//! calling it twice without a mutation in between changes nothing.

use super::base::StatRecord;
use super::bonus::{BonusStack, StatBounds};
use super::delta::StatDelta;
use super::derived::DerivedStats;
use super::equipment::equipment_delta;
use crate::buff::BuffSet;
use crate::config::GameConfig;
use crate::env::{ClassBase, Env, OracleError, SkillOracle};
use crate::inventory::Inventory;
use crate::state::CharacterRecord;

/// Everything the pipeline reads, borrowed from one character.
#[derive(Clone, Copy, Debug)]
pub struct StatInputs<'a> {
    pub record: &'a CharacterRecord,
    pub base: &'a StatRecord,
    pub inventory: &'a Inventory,
    pub buffs: &'a BuffSet,
}

/// Rebuilds derived stats from scratch.
///
/// # Errors
///
/// Returns an [`OracleError`] if the environment lacks the item, skill or
/// tables oracle, or has no base table for the character's class.
pub fn recalculate(
    inputs: &StatInputs<'_>,
    env: &Env<'_>,
    config: &GameConfig,
) -> Result<DerivedStats, OracleError> {
    let class = env
        .tables()?
        .class_base(inputs.record.class)
        .ok_or(OracleError::UnknownClass(inputs.record.class))?;

    let mut total = inputs.buffs.stat_delta();
    total += passive_delta(inputs.record, env.skills()?);
    total += equipment_delta(inputs.inventory, env.items()?);

    let penalty = config.injury_penalty_pct(inputs.record.injury);
    Ok(derive(inputs.base, inputs.record.level, &class, &total, penalty, config))
}

/// Sum of every learned job passive at its learned level.
pub fn passive_delta(record: &CharacterRecord, skills: &dyn SkillOracle) -> StatDelta {
    record
        .skills
        .iter()
        .filter_map(|learned| {
            skills
                .passive(learned.skill)
                .map(|passive| passive.delta_at(learned.plus))
        })
        .sum()
}

fn primary(base: u32, delta: i32) -> i64 {
    (i64::from(base) + i64::from(delta)).max(0)
}

fn derive(
    base: &StatRecord,
    level: u16,
    class: &ClassBase,
    total: &StatDelta,
    penalty: u32,
    config: &GameConfig,
) -> DerivedStats {
    let f = &config.formula;
    let penalty = i32::try_from(penalty).unwrap_or(100).min(100);

    let str = primary(base.str, total.str);
    let dex = primary(base.dex, total.dex);
    let int = primary(base.int, total.int);
    let wind = primary(base.wind, total.wind);
    let water = primary(base.water, total.water);
    let fire = primary(base.fire, total.fire);
    let elemental = wind + water + fire;

    let offense = BonusStack::new().increased(total.atk_pct).less(penalty);
    let guard = BonusStack::new().increased(total.def_pct).less(penalty);
    let worn = BonusStack::new().less(penalty);
    let plain = BonusStack::new();

    let max_hp = BonusStack::new().increased(total.max_hp_pct).apply_bounded(
        i64::from(class.max_hp_at(level)) + str * i64::from(f.hp_per_str) + i64::from(total.max_hp),
        StatBounds::RESOURCE,
    );
    let max_chi = plain.apply_bounded(
        i64::from(class.max_chi_at(level))
            + int * i64::from(f.chi_per_int)
            + i64::from(total.max_chi),
        StatBounds::RESOURCE,
    );

    let physical = str * i64::from(f.atk_per_str);
    let physical_max = physical * (100 + i64::from(f.atk_spread_pct)) / 100;
    let min_atk = offense.apply_bounded(physical + i64::from(total.min_atk), StatBounds::DERIVED);
    let max_atk = offense
        .apply_bounded(physical_max + i64::from(total.max_atk), StatBounds::DERIVED)
        .max(min_atk);

    // Arts attack scales with INT and with INT × physical attack.
    let divisor = i64::from(f.arts_cross_divisor.max(1));
    let arts = int * i64::from(f.arts_per_int);
    let min_arts_atk = offense.apply_bounded(
        arts + int * i64::from(min_atk) / divisor + i64::from(total.min_arts_atk),
        StatBounds::DERIVED,
    );
    let max_arts_atk = offense
        .apply_bounded(
            arts + int * i64::from(max_atk) / divisor + i64::from(total.max_arts_atk),
            StatBounds::DERIVED,
        )
        .max(min_arts_atk);

    let defense = guard.apply_bounded(
        dex * i64::from(f.defense_per_dex)
            + elemental * i64::from(f.defense_per_elemental)
            + i64::from(total.defense),
        StatBounds::DERIVED,
    );
    let arts_defense = guard.apply_bounded(
        int * i64::from(f.arts_defense_per_int)
            + elemental * i64::from(f.defense_per_elemental)
            + i64::from(total.arts_defense),
        StatBounds::DERIVED,
    );
    let accuracy = worn.apply_bounded(
        dex * i64::from(f.accuracy_per_dex) + i64::from(total.accuracy),
        StatBounds::DERIVED,
    );
    let dodge = plain.apply_bounded(
        dex * i64::from(f.dodge_per_dex) + i64::from(total.dodge),
        StatBounds::DERIVED,
    );

    let resistance = |points: i64, delta: i32| {
        plain.apply_bounded(
            points * i64::from(f.resistance_per_point) + i64::from(delta),
            StatBounds::DERIVED,
        )
    };

    let dex_u32 = u32::try_from(dex).unwrap_or(u32::MAX);
    let critical_rate = plain.apply_bounded(
        i64::from(config.dex_critical_rate(dex_u32)) + i64::from(total.critical_rate),
        StatBounds::CHANCE,
    );

    let attack_speed = (i64::from(class.base_attack_speed) + i64::from(total.attack_speed))
        .clamp(0, i64::from(config.attack_speed_cap));

    let rate = |delta: i32| plain.apply_bounded(100 + i64::from(delta), StatBounds::DERIVED);

    DerivedStats {
        str: u32::try_from(str).unwrap_or(u32::MAX),
        dex: dex_u32,
        int: u32::try_from(int).unwrap_or(u32::MAX),
        wind: u32::try_from(wind).unwrap_or(u32::MAX),
        water: u32::try_from(water).unwrap_or(u32::MAX),
        fire: u32::try_from(fire).unwrap_or(u32::MAX),
        max_hp,
        max_chi,
        min_atk,
        max_atk,
        min_arts_atk,
        max_arts_atk,
        defense,
        arts_defense,
        accuracy,
        dodge,
        wind_res: resistance(wind, total.wind_res),
        water_res: resistance(water, total.water_res),
        fire_res: resistance(fire, total.fire_res),
        critical_rate,
        reflect_rate: plain.apply_bounded(i64::from(total.reflect_rate), StatBounds::CHANCE),
        absorb_rate: plain.apply_bounded(i64::from(total.absorb_rate), StatBounds::CHANCE),
        attack_speed: u32::try_from(attack_speed).unwrap_or(0),
        hp_regen: plain.apply_bounded(
            i64::from(f.hp_regen_base) + i64::from(total.hp_regen),
            StatBounds::DERIVED,
        ),
        chi_regen: plain.apply_bounded(
            i64::from(f.chi_regen_base) + i64::from(total.chi_regen),
            StatBounds::DERIVED,
        ),
        exp_rate: rate(total.exp_rate),
        drop_rate: rate(total.drop_rate),
        gold_rate: rate(total.gold_rate),
        injury_penalty_pct: u32::try_from(penalty).unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::{BuffSpecial, ClockKind, ClockReading};
    use crate::env::{BuffDefinition, ItemClass, ItemDefinition, ItemSetDefinition, PassiveDefinition};
    use crate::inventory::{InventorySlot, SECONDARY_WEAPON_SLOT, WEAPON_SLOT};
    use crate::state::{BuffTypeId, CharacterId, ItemId, JobClass, LearnedSkill, Position, SkillId};
    use crate::testkit::TestData;

    const SWORD: ItemId = ItemId(1);
    const DAGGER: ItemId = ItemId(2);
    const HELM: ItemId = ItemId(3);
    const ARMOR: ItemId = ItemId(4);

    fn data() -> TestData {
        let mut data = TestData::default();
        data.add_item(
            ItemDefinition::new(SWORD, ItemClass::Equipment { slot: WEAPON_SLOT })
                .with_stats(StatDelta {
                    min_atk: 100,
                    max_atk: 120,
                    ..StatDelta::ZERO
                })
                .with_per_plus(StatDelta {
                    min_atk: 10,
                    ..StatDelta::ZERO
                }),
        );
        data.add_item(
            ItemDefinition::new(DAGGER, ItemClass::Equipment { slot: WEAPON_SLOT }).with_stats(
                StatDelta {
                    min_atk: 40,
                    max_atk: 50,
                    ..StatDelta::ZERO
                },
            ),
        );
        data.add_item(
            ItemDefinition::new(HELM, ItemClass::Equipment { slot: 0 }).with_stats(StatDelta {
                defense: 20,
                ..StatDelta::ZERO
            }),
        );
        data.add_item(
            ItemDefinition::new(ARMOR, ItemClass::Equipment { slot: 1 }).with_stats(StatDelta {
                defense: 30,
                ..StatDelta::ZERO
            }),
        );
        data
    }

    fn record() -> CharacterRecord {
        CharacterRecord::new(CharacterId(1), "tester", JobClass::Warrior, Position::default())
    }

    fn run(
        data: &TestData,
        record: &CharacterRecord,
        inventory: &Inventory,
        buffs: &BuffSet,
    ) -> DerivedStats {
        let base = StatRecord::default();
        let inputs = StatInputs {
            record,
            base: &base,
            inventory,
            buffs,
        };
        recalculate(&inputs, &data.env(), &GameConfig::default()).unwrap()
    }

    fn equip(inventory: &mut Inventory, index: u16, item: ItemId) {
        *inventory.slot_mut(index).unwrap() = InventorySlot::new(item, 1);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let data = data();
        let mut inventory = Inventory::new();
        equip(&mut inventory, WEAPON_SLOT, SWORD);
        equip(&mut inventory, 0, HELM);
        let record = record();
        let buffs = BuffSet::new();

        let first = run(&data, &record, &inventory, &buffs);
        let second = run(&data, &record, &inventory, &buffs);
        assert_eq!(first, second);
    }

    #[test]
    fn secondary_weapon_ignored_while_main_weapon_equipped() {
        let data = data();
        let record = record();
        let buffs = BuffSet::new();

        let mut main_only = Inventory::new();
        equip(&mut main_only, WEAPON_SLOT, SWORD);
        let mut both = main_only.clone();
        equip(&mut both, SECONDARY_WEAPON_SLOT, DAGGER);

        assert_eq!(
            run(&data, &record, &main_only, &buffs),
            run(&data, &record, &both, &buffs)
        );

        let mut off_hand_only = Inventory::new();
        equip(&mut off_hand_only, SECONDARY_WEAPON_SLOT, DAGGER);
        let unarmed = run(&data, &record, &Inventory::new(), &buffs);
        assert!(run(&data, &record, &off_hand_only, &buffs).min_atk > unarmed.min_atk);
    }

    #[test]
    fn plus_levels_scale_item_grants() {
        let data = data();
        let record = record();
        let buffs = BuffSet::new();
        let mut plain = Inventory::new();
        equip(&mut plain, WEAPON_SLOT, SWORD);
        let mut upgraded = Inventory::new();
        *upgraded.slot_mut(WEAPON_SLOT).unwrap() = InventorySlot::new(SWORD, 1).with_plus(3);

        let plain = run(&data, &record, &plain, &buffs);
        let upgraded = run(&data, &record, &upgraded, &buffs);
        assert_eq!(upgraded.min_atk - plain.min_atk, 30);
    }

    #[test]
    fn stones_are_summed_recursively() {
        let mut data = data();
        data.add_stone(
            7,
            ItemDefinition::new(ItemId(70), ItemClass::Stone { code: 7 }).with_stats(StatDelta {
                defense: 5,
                ..StatDelta::ZERO
            }),
        );
        data.add_stone(
            8,
            ItemDefinition::new(ItemId(80), ItemClass::Stone { code: 8 })
                .with_stats(StatDelta {
                    defense: 1,
                    ..StatDelta::ZERO
                })
                .with_components(vec![7]),
        );
        let record = record();
        let buffs = BuffSet::new();
        let mut bare = Inventory::new();
        equip(&mut bare, 0, HELM);
        let mut socketed = bare.clone();
        let helm = socketed.slot_mut(0).unwrap();
        helm.add_upgrade(7);
        helm.socket_count = 1;
        helm.add_socket(8);

        let bare = run(&data, &record, &bare, &buffs);
        let socketed = run(&data, &record, &socketed, &buffs);
        assert_eq!(socketed.defense - bare.defense, 5 + 1 + 5);
    }

    #[test]
    fn set_bonus_needs_every_piece() {
        let mut data = data();
        data.add_set(ItemSetDefinition {
            id: 1,
            items: vec![HELM, ARMOR],
            bonus: StatDelta {
                max_hp: 500,
                ..StatDelta::ZERO
            },
        });
        let record = record();
        let buffs = BuffSet::new();
        let mut partial = Inventory::new();
        equip(&mut partial, 0, HELM);
        let mut full = partial.clone();
        equip(&mut full, 1, ARMOR);

        let partial = run(&data, &record, &partial, &buffs);
        let full = run(&data, &record, &full, &buffs);
        assert_eq!(full.max_hp - partial.max_hp, 500);
    }

    #[test]
    fn buffs_count_but_poison_does_not() {
        let data = data();
        let record = record();
        let inventory = Inventory::new();
        let clock = ClockReading::default();
        let mut buffs = BuffSet::new();
        let baseline = run(&data, &record, &inventory, &buffs);

        let guard = BuffDefinition::new(BuffTypeId(1), ClockKind::CharacterTick, 60).with_delta(
            StatDelta {
                defense: 25,
                ..StatDelta::ZERO
            },
        );
        let poison = BuffDefinition::new(BuffTypeId(2), ClockKind::CharacterTick, 60)
            .with_special(BuffSpecial::Poison { damage: 3 })
            .with_delta(StatDelta {
                defense: -1_000,
                ..StatDelta::ZERO
            });
        buffs.grant(&guard, record.id, 0, &clock);
        buffs.grant(&poison, record.id, 0, &clock);

        let buffed = run(&data, &record, &inventory, &buffs);
        assert_eq!(buffed.defense, baseline.defense + 25);
    }

    #[test]
    fn passives_scale_with_level() {
        let mut data = data();
        data.add_passive(PassiveDefinition {
            id: SkillId(50),
            per_level: StatDelta {
                accuracy: 4,
                ..StatDelta::ZERO
            },
        });
        let mut record = record();
        let inventory = Inventory::new();
        let buffs = BuffSet::new();
        let baseline = run(&data, &record, &inventory, &buffs);
        record.skills.push(LearnedSkill::new(SkillId(50), 3));
        let trained = run(&data, &record, &inventory, &buffs);
        assert_eq!(trained.accuracy - baseline.accuracy, 12);
    }

    #[test]
    fn heavy_injury_reduces_offense_and_defense() {
        let data = data();
        let mut record = record();
        let mut inventory = Inventory::new();
        equip(&mut inventory, WEAPON_SLOT, SWORD);
        equip(&mut inventory, 0, HELM);
        let buffs = BuffSet::new();
        let healthy = run(&data, &record, &inventory, &buffs);
        record.injury = 950;
        let injured = run(&data, &record, &inventory, &buffs);

        assert_eq!(injured.injury_penalty_pct, 30);
        assert!(injured.min_atk < healthy.min_atk);
        assert!(injured.defense < healthy.defense);
        assert!(injured.accuracy < healthy.accuracy);
        assert_eq!(injured.max_hp, healthy.max_hp);
    }

    #[test]
    fn attack_speed_is_capped() {
        let data = data();
        let record = record();
        let inventory = Inventory::new();
        let mut buffs = BuffSet::new();
        let haste = BuffDefinition::new(BuffTypeId(3), ClockKind::CharacterTick, 60).with_delta(
            StatDelta {
                attack_speed: 1_000_000,
                ..StatDelta::ZERO
            },
        );
        buffs.grant(&haste, record.id, 0, &ClockReading::default());
        let stats = run(&data, &record, &inventory, &buffs);
        assert_eq!(stats.attack_speed, GameConfig::default().attack_speed_cap);
    }
}
