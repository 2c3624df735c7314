use mmo_core::{CharacterId, DropId, Position, Rejection};
use tracing::debug;

use super::reject;
use crate::World;
use crate::api::{ActionResult, Result};
use crate::events::GameEvent;

impl World {
    /// Starts a duel between two online characters. Both must be free.
    pub fn start_duel(&self, challenger: CharacterId, opponent: CharacterId) -> Result<ActionResult> {
        if challenger == opponent {
            return Ok(ActionResult::rejected(Rejection::InvalidTarget));
        }
        let first = self.characters.require(challenger)?;
        let Some(second) = self.characters.get(opponent)? else {
            return Ok(ActionResult::rejected(Rejection::InvalidTarget));
        };
        if !first.is_alive()? || !second.is_alive()? {
            return Ok(ActionResult::rejected(Rejection::InvalidTarget));
        }

        // Both duel slots are taken in id order.
        let (low, high) = if first.id() < second.id() {
            (&first, &second)
        } else {
            (&second, &first)
        };
        {
            let mut low_duel = low.duel()?;
            let mut high_duel = high.duel()?;
            if low_duel.is_some() || high_duel.is_some() {
                return Ok(ActionResult::rejected(Rejection::AlreadyInDuel));
            }
            *low_duel = Some(high.id());
            *high_duel = Some(low.id());
        }

        debug!(%challenger, %opponent, "duel started");
        self.publish_near(
            &first,
            GameEvent::DuelStarted {
                challenger,
                opponent,
            },
        )?;
        Ok(ActionResult::success())
    }

    /// Moves a ground drop into the inventory. Drops reserved for another
    /// character cannot be taken.
    pub fn pick_up(&self, id: CharacterId, drop_id: DropId) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        if !live.flags().can_act() {
            return Ok(ActionResult::rejected(Rejection::CannotAct));
        }
        let Some(ground) = self.drops.get(drop_id)? else {
            return Ok(ActionResult::rejected(Rejection::InvalidTarget));
        };
        if ground.owner.is_some_and(|owner| owner != id) {
            return Ok(ActionResult::rejected(Rejection::TransferNotAllowed));
        }
        let position = live.record()?.position;
        if !position.within(&ground.position, self.config.visibility_radius) {
            return Ok(ActionResult::rejected(Rejection::OutOfRange));
        }

        let _replace = live.replace_guard()?;
        let mut inventory = live.inventory(self.inventory_repo())?;
        // Only one caller gets the drop out of the registry.
        let Some(ground) = self.drops.take(drop_id)? else {
            return Ok(ActionResult::rejected(Rejection::InvalidTarget));
        };
        let context = live.slot_context()?;
        let outcome = match inventory.add_item(
            ground.slot.clone(),
            None,
            true,
            context,
            self.oracles.items.as_ref(),
            &self.config.game,
        ) {
            Ok(outcome) => outcome,
            Err(error) => {
                self.drops.restore(ground)?;
                return Ok(reject(error, id, "pick_up"));
            }
        };

        debug!(character = %id, drop = ?drop_id, item = ?ground.slot.item, "drop picked up");
        let result =
            self.finish_slot_change(&live, &inventory, outcome.touched, outcome.stats_dirty)?;
        drop(inventory);
        self.publish_at(&ground.position, GameEvent::DropRemoved { drop: drop_id })?;
        Ok(result)
    }

    /// Places the character at `position`. Path validation belongs to the
    /// movement layer; the new position takes effect for reach checks and
    /// the next visibility refresh.
    pub fn move_to(&self, id: CharacterId, position: Position) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        if !live.flags().can_act() {
            return Ok(ActionResult::rejected(Rejection::CannotAct));
        }
        live.record_mut()?.position = position;
        live.mark_dirty();
        Ok(ActionResult::success())
    }
}
