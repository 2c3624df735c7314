use std::sync::Mutex;

use mmo_core::{LifeState, NpcInstanceId, NpcTemplate, Position};

use super::{Vitals, lock};
use crate::api::Result;

/// A spawned NPC. Position is fixed at its spawn point.
#[derive(Debug)]
pub struct LiveNpc {
    id: NpcInstanceId,
    template: NpcTemplate,
    position: Position,
    vitals: Vitals,
    life: Mutex<LifeState>,
}

impl LiveNpc {
    pub fn new(id: NpcInstanceId, template: NpcTemplate, position: Position) -> Self {
        Self {
            id,
            vitals: Vitals::new(template.max_hp, 0),
            template,
            position,
            life: Mutex::new(LifeState::Alive),
        }
    }

    pub fn id(&self) -> NpcInstanceId {
        self.id
    }

    pub fn template(&self) -> &NpcTemplate {
        &self.template
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn is_alive(&self) -> Result<bool> {
        Ok(lock(&self.life)?.is_alive())
    }

    /// Runs `f` on the life state under its lock.
    pub fn with_life<R>(&self, f: impl FnOnce(&mut LifeState) -> R) -> Result<R> {
        Ok(f(&mut *lock(&self.life)?))
    }

    /// Back to full HP and `Alive`. Returns false if the NPC was not waiting
    /// to respawn.
    pub fn respawn(&self) -> Result<bool> {
        let mut life = lock(&self.life)?;
        if !life.revive() {
            return Ok(false);
        }
        self.vitals.refill(self.template.max_hp, 0);
        Ok(true)
    }
}
