//! Per-character and per-pet tick tasks.
//!
//! Each online character gets its own task; a summoned pet gets another.
//! Tasks hold only a weak reference to the world and stop as soon as their
//! tick reports the subject gone.

use std::sync::Arc;

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error};

use crate::World;
use crate::api::Result;
use crate::live::LiveCharacter;

pub(crate) fn spawn_character_tick(world: &Arc<World>, live: &LiveCharacter) -> Result<()> {
    let weak = Arc::downgrade(world);
    let id = live.id();
    let period = world.config.tick_interval;

    let handle = tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            let Some(world) = weak.upgrade() else {
                break;
            };
            match world.tick_character(id) {
                Ok(true) => {}
                Ok(false) => break,
                Err(error) => error!(character = %id, %error, "character tick failed"),
            }
        }
        debug!(character = %id, "character tick stopped");
    });
    live.attach_tick_task(handle.abort_handle())
}

pub(crate) fn spawn_pet_tick(world: &Arc<World>, live: &LiveCharacter) -> Result<()> {
    let weak = Arc::downgrade(world);
    let id = live.id();
    let period = world.config.tick_interval;

    let handle = tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;
        loop {
            interval.tick().await;
            let Some(world) = weak.upgrade() else {
                break;
            };
            match world.tick_pet(id) {
                Ok(true) => {}
                Ok(false) => break,
                Err(error) => error!(character = %id, %error, "pet tick failed"),
            }
        }
        debug!(character = %id, "pet tick stopped");
    });
    live.attach_pet_task(handle.abort_handle())
}
