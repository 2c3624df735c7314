mod common;

use std::sync::Arc;

use common::{HERB, VIGOR, character};
use mmo_core::{InventorySlot, Tick};
use mmo_runtime::{
    CharacterRepository, FileCharacterStore, InMemoryCharacterStore, InventoryRepository,
    RuntimeError,
};

#[tokio::test]
async fn logout_writes_the_character_before_returning() {
    let store = Arc::new(InMemoryCharacterStore::new());
    let runtime = common::runtime_with_store(Arc::clone(&store)).await;
    let world = runtime.world();
    let id = character(7);

    let live = world.login(id).unwrap();
    world.add_gold(id, 321).unwrap();
    world
        .add_item(id, InventorySlot::new(HERB, 42), None, false)
        .unwrap();
    live.set_tick(Tick(50));
    world.apply_buff(id, VIGOR, 0).unwrap();
    drop(live);

    runtime.logout(id).await.unwrap();
    assert!(world.characters().get(id).unwrap().is_none());

    let snapshot = store.load(id).unwrap().expect("saved on logout");
    assert_eq!(snapshot.record.gold, 321);
    assert_eq!(snapshot.buffs.len(), 1);
    assert_eq!(snapshot.buffs[0].type_id, VIGOR);

    let slots = store.load_slots(id).unwrap().expect("inventory saved");
    assert_eq!(slots[11], InventorySlot::new(HERB, 42));
}

#[tokio::test]
async fn logging_in_twice_is_refused() {
    let runtime = common::runtime().await;
    let id = character(1);
    runtime.login(id).unwrap();

    assert!(matches!(
        runtime.login(id),
        Err(RuntimeError::AlreadyOnline(online)) if online == id
    ));
    assert!(matches!(
        runtime.logout(character(2)).await,
        Err(RuntimeError::UnknownCharacter(_))
    ));
}

#[tokio::test]
async fn characters_survive_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let id = character(3);

    {
        let store = Arc::new(FileCharacterStore::new(dir.path()).unwrap());
        let runtime = common::runtime_with_store_dyn(
            Arc::clone(&store) as Arc<dyn CharacterRepository>,
            store as Arc<dyn InventoryRepository>,
        )
        .await;
        let world = runtime.world();
        world.login(id).unwrap();
        world.add_gold(id, 99).unwrap();
        world
            .add_item(id, InventorySlot::new(HERB, 7), None, false)
            .unwrap();
        runtime.shutdown().await.unwrap();
    }

    let store = Arc::new(FileCharacterStore::new(dir.path()).unwrap());
    assert_eq!(store.list_ids().unwrap(), vec![id]);
    let runtime = common::runtime_with_store_dyn(
        Arc::clone(&store) as Arc<dyn CharacterRepository>,
        store as Arc<dyn InventoryRepository>,
    )
    .await;
    let world = runtime.world();
    world.login(id).unwrap();
    assert_eq!(world.gold(id).unwrap(), 99);
    assert_eq!(world.slots(id).unwrap()[11].quantity, 7);
}

#[tokio::test]
async fn shutdown_logs_everyone_out() {
    let store = Arc::new(InMemoryCharacterStore::new());
    let runtime = common::runtime_with_store(Arc::clone(&store)).await;
    for id in 1..=3 {
        runtime.login(character(id)).unwrap();
    }

    runtime.shutdown().await.unwrap();
    assert_eq!(
        store.list_ids().unwrap(),
        vec![character(1), character(2), character(3)]
    );
}
