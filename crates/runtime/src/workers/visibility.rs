use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use crate::World;

/// Rebuilds every character's sight sets each `period` until the world is
/// dropped or the task is aborted.
pub(crate) fn spawn_visibility(world: Weak<World>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(?period, "visibility refresh started");
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let Some(world) = world.upgrade() else {
                break;
            };
            if let Err(error) = world.refresh_visibility() {
                warn!(%error, "visibility refresh failed");
            }
        }
        info!("visibility refresh stopped");
    })
}
