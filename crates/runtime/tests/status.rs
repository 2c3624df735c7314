mod common;

use std::sync::Arc;

use common::{BLESS, CLEAVER, DAZE, FLAG, STING, STUN, VENOM, VIGOR, WARD, character};
use mmo_core::{CharacterFlags, CharacterId, InventorySlot, LearnedSkill, Rejection, SkillId};
use mmo_runtime::{Combatant, Event, GameEvent, Topic, World};
use tokio::sync::broadcast::Receiver;

fn drain(events: &mut Receiver<Event>) -> Vec<GameEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event.payload);
    }
    drained
}

fn learn(world: &World, id: CharacterId, skill: SkillId) {
    let live = world.characters().require(id).unwrap();
    live.record_mut().unwrap().skills.push(LearnedSkill::new(skill, 1));
}

fn carries(world: &World, id: CharacterId, item: mmo_core::ItemId) -> bool {
    world.slots(id).unwrap().iter().any(|slot| slot.item == item)
}

#[tokio::test]
async fn dying_strips_death_buffs_and_drops_flags() {
    let runtime = common::runtime().await;
    let mut character_events = runtime.subscribe(Topic::Character);
    let world = runtime.world();
    let (a, b) = (character(1), character(2));
    world.login(a).unwrap();
    let loser = world.login(b).unwrap();
    world
        .add_item(a, InventorySlot::new(CLEAVER, 1), Some(3), false)
        .unwrap();
    world
        .add_item(b, InventorySlot::new(FLAG, 1), None, false)
        .unwrap();
    world.apply_buff(b, WARD, 0).unwrap();
    world.apply_buff(b, VIGOR, 0).unwrap();

    world.start_duel(a, b).unwrap();
    let hp = loser.vitals().hp();
    let _ = loser.vitals().damage(hp - 1);
    world.attack_player(a, b).unwrap();
    assert!(!loser.is_alive().unwrap());

    let buffs = loser.buffs().unwrap();
    assert!(!buffs.contains(WARD));
    assert!(buffs.contains(VIGOR));
    drop(buffs);
    assert!(drain(&mut character_events).iter().any(|event| matches!(
        event,
        GameEvent::BuffExpired { character, buff } if *character == b && *buff == WARD
    )));

    assert!(!carries(world, b, FLAG));
    let drops = world.drops().near(&common::spawn_point(), 10).unwrap();
    assert_eq!(drops.len(), 1);
    let ground = world.drops().get(drops[0]).unwrap().unwrap();
    assert_eq!(ground.slot.item, FLAG);
    assert_eq!(ground.owner, None);

    // Anyone may take a dropped flag.
    assert!(world.pick_up(a, ground.id).unwrap().succeeded);
    assert!(carries(world, a, FLAG));
    assert!(world.drops().get(ground.id).unwrap().is_none());
}

#[tokio::test]
async fn lethal_poison_kills_once() {
    let runtime = common::runtime().await;
    let mut combat = runtime.subscribe(Topic::Combat);
    let world = Arc::clone(runtime.world());
    let id = character(1);
    let live = world.login(id).unwrap();

    world.apply_buff(id, VENOM, 0).unwrap();
    world.tick_character(id).unwrap();
    world.tick_character(id).unwrap();
    assert!(live.is_alive().unwrap());

    world.tick_character(id).unwrap();
    assert!(!live.is_alive().unwrap());
    assert_eq!(live.vitals().hp(), 0);

    // The next poison tick falls on a corpse.
    for _ in 0..3 {
        assert!(world.tick_character(id).unwrap());
    }
    let deaths: Vec<_> = drain(&mut combat)
        .into_iter()
        .filter(|event| matches!(event, GameEvent::Died { .. }))
        .collect();
    assert_eq!(deaths.len(), 1);
    assert!(matches!(
        deaths[0],
        GameEvent::Died { victim: Combatant::Character(victim), killer: None } if victim == id
    ));
}

#[tokio::test]
async fn paralysis_blocks_attacks_and_casts_until_it_wears_off() {
    let runtime = common::runtime().await;
    let world = runtime.world();
    let id = character(1);
    let live = world.login(id).unwrap();
    learn(world, id, BLESS);
    let npc = world.npcs().all().unwrap()[0].id();

    world.apply_buff(id, STUN, 0).unwrap();
    assert!(live.flags().contains(CharacterFlags::PARALYZED));
    let attack = world.attack_npc(id, npc).unwrap();
    assert_eq!(attack.rejection, Some(Rejection::CannotAct));
    let cast = world.cast_buff_skill(id, id, BLESS).unwrap();
    assert_eq!(cast.rejection, Some(Rejection::CannotAct));
    let strike = world
        .cast_attack_skill(id, Combatant::Npc(npc), STING)
        .unwrap();
    assert_eq!(strike.rejection, Some(Rejection::CannotAct));

    for _ in 0..5 {
        world.tick_character(id).unwrap();
    }
    assert!(!live.flags().contains(CharacterFlags::PARALYZED));
    assert!(world.attack_npc(id, npc).unwrap().succeeded);
}

#[tokio::test]
async fn confusion_blocks_only_casting() {
    let runtime = common::runtime().await;
    let world = runtime.world();
    let id = character(1);
    let live = world.login(id).unwrap();
    learn(world, id, BLESS);
    let npc = world.npcs().all().unwrap()[0].id();

    world.apply_buff(id, DAZE, 0).unwrap();
    let cast = world.cast_buff_skill(id, id, BLESS).unwrap();
    assert_eq!(cast.rejection, Some(Rejection::CannotCast));
    assert!(!live.buffs().unwrap().contains(VIGOR));
    assert!(world.attack_npc(id, npc).unwrap().succeeded);

    for _ in 0..5 {
        world.tick_character(id).unwrap();
    }
    assert!(world.cast_buff_skill(id, id, BLESS).unwrap().succeeded);
    assert!(live.buffs().unwrap().contains(VIGOR));
}

#[tokio::test]
async fn attack_skill_inflicts_its_status_on_a_hit() {
    let runtime = common::runtime().await;
    let world = runtime.world();
    let (a, b) = (character(1), character(2));
    world.login(a).unwrap();
    let target = world.login(b).unwrap();
    learn(world, a, STING);

    let refused = world
        .cast_attack_skill(a, Combatant::Character(b), STING)
        .unwrap();
    assert_eq!(refused.rejection, Some(Rejection::NotHostile));

    world.start_duel(a, b).unwrap();
    let hit = world
        .cast_attack_skill(a, Combatant::Character(b), STING)
        .unwrap();
    assert!(hit.succeeded);
    assert!(hit.attack.is_some_and(|attack| attack.is_hit()));
    assert!(target.is_alive().unwrap());
    assert!(target.buffs().unwrap().contains(STUN));
    assert!(target.flags().contains(CharacterFlags::PARALYZED));

    let paralysed = world.attack_player(b, a).unwrap();
    assert_eq!(paralysed.rejection, Some(Rejection::CannotAct));
}
