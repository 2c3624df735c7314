mod common;

use common::{MIGHT, VIGOR, character};
use mmo_core::Tick;
use mmo_runtime::{Event, GameEvent, Topic};
use tokio::sync::broadcast::Receiver;

fn expirations(events: &mut Receiver<Event>) -> usize {
    let mut count = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event.payload, GameEvent::BuffExpired { buff, .. } if buff == VIGOR) {
            count += 1;
        }
    }
    count
}

#[tokio::test]
async fn tick_clock_buff_expires_exactly_at_its_deadline() {
    let runtime = common::runtime().await;
    let mut events = runtime.subscribe(Topic::Character);
    let world = runtime.world();
    let id = character(1);
    let live = world.login(id).unwrap();
    let base_hp = live.stats().unwrap().max_hp;

    live.set_tick(Tick(1_000));
    let applied = world.apply_buff(id, VIGOR, 0).unwrap();
    assert!(applied.succeeded);
    assert_eq!(applied.stats.unwrap().max_hp, base_hp + 100);

    live.set_tick(Tick(1_598));
    assert!(world.tick_character(id).unwrap());
    assert_eq!(live.tick(), Tick(1_599));
    assert!(live.buffs().unwrap().contains(VIGOR));
    assert_eq!(live.stats().unwrap().max_hp, base_hp + 100);

    assert!(world.tick_character(id).unwrap());
    assert!(!live.buffs().unwrap().contains(VIGOR));
    assert_eq!(live.stats().unwrap().max_hp, base_hp);

    assert!(world.tick_character(id).unwrap());
    assert_eq!(live.stats().unwrap().max_hp, base_hp);
    assert_eq!(expirations(&mut events), 1);
}

#[tokio::test]
async fn refreshing_a_buff_does_not_stack_its_bonus() {
    let runtime = common::runtime().await;
    let world = runtime.world();
    let id = character(1);
    let live = world.login(id).unwrap();
    let base_hp = live.stats().unwrap().max_hp;

    live.set_tick(Tick(10));
    world.apply_buff(id, VIGOR, 0).unwrap();
    live.set_tick(Tick(400));
    world.apply_buff(id, VIGOR, 0).unwrap();
    assert_eq!(live.stats().unwrap().max_hp, base_hp + 100);

    // Refreshed at 400, so the first deadline (610) no longer applies.
    live.set_tick(Tick(700));
    world.tick_character(id).unwrap();
    assert!(live.buffs().unwrap().contains(VIGOR));

    live.set_tick(Tick(999));
    world.tick_character(id).unwrap();
    assert!(!live.buffs().unwrap().contains(VIGOR));
    assert_eq!(live.stats().unwrap().max_hp, base_hp);
}

#[tokio::test]
async fn unknown_buff_is_ignored() {
    let runtime = common::runtime().await;
    let world = runtime.world();
    let id = character(1);
    let live = world.login(id).unwrap();

    let result = world.apply_buff(id, mmo_core::BuffTypeId(999), 0).unwrap();
    assert!(result.succeeded);
    assert!(result.stats.is_none());
    assert!(live.buffs().unwrap().is_empty());
}

#[tokio::test]
async fn expiry_restores_every_stat_the_grant_fed() {
    let runtime = common::runtime().await;
    let world = runtime.world();
    let id = character(1);
    let live = world.login(id).unwrap();
    let before = live.stats().unwrap().clone();

    live.set_tick(Tick(100));
    let buffed = world.apply_buff(id, MIGHT, 0).unwrap().stats.unwrap();
    assert!(buffed.max_hp > before.max_hp);
    assert!(buffed.min_atk > before.min_atk);

    live.set_tick(Tick(109));
    world.tick_character(id).unwrap();
    assert!(!live.buffs().unwrap().contains(MIGHT));
    assert_eq!(*live.stats().unwrap(), before);
}

#[tokio::test]
async fn character_clock_resumes_after_relogging() {
    let runtime = common::runtime().await;
    let world = runtime.world();
    let id = character(1);

    let live = world.login(id).unwrap();
    live.set_tick(Tick(5_000));
    world.apply_buff(id, VIGOR, 0).unwrap();
    live.set_tick(Tick(5_100));
    drop(live);
    runtime.logout(id).await.unwrap();

    let live = world.login(id).unwrap();
    assert_eq!(live.tick(), Tick(5_100));
    for _ in 0..499 {
        world.tick_character(id).unwrap();
    }
    assert!(live.buffs().unwrap().contains(VIGOR));

    world.tick_character(id).unwrap();
    assert_eq!(live.tick(), Tick(5_600));
    assert!(!live.buffs().unwrap().contains(VIGOR));
}
