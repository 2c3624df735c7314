//! Deaths, kill rewards and respawns.
//!
//! Each death is handled by whichever task observed the lethal hit; the
//! `Alive → Dead` transition on the life state guarantees the side effects
//! run once even when several hits land together.

use std::sync::{Arc, Weak};
use std::time::Duration;

use mmo_core::{
    ActionError, CharacterFlags, CharacterId, Epoch, InventorySlot, LifeState, NpcInstanceId,
    Position,
};
use tracing::{debug, info, warn};

use crate::World;
use crate::api::Result;
use crate::events::{Combatant, GameEvent};
use crate::live::{LiveCharacter, LiveNpc};
use crate::party::DistributionMode;

impl World {
    pub(crate) fn npc_death(
        self: &Arc<Self>,
        npc: &Arc<LiveNpc>,
        killer: Option<&Arc<LiveCharacter>>,
    ) -> Result<()> {
        if !npc.with_life(LifeState::die)? {
            return Ok(());
        }
        debug!(npc = ?npc.id(), killer = ?killer.map(|live| live.id()), "npc died");
        self.publish_at(
            &npc.position(),
            GameEvent::Died {
                victim: Combatant::Npc(npc.id()),
                killer: killer.map(|live| Combatant::Character(live.id())),
            },
        )?;

        if let Some(killer) = killer {
            self.reward_kill(killer, npc)?;
        }
        self.schedule_npc_respawn(npc)
    }

    /// Experience and loot for a kill, shared with nearby party members
    /// when the party distributes.
    fn reward_kill(self: &Arc<Self>, killer: &Arc<LiveCharacter>, npc: &LiveNpc) -> Result<()> {
        killer.record_mut()?.npc_kills += 1;
        killer.mark_dirty();

        let (exp_rate, drop_rate) = {
            let stats = killer.stats()?;
            (stats.exp_rate, stats.drop_rate)
        };
        let template = npc.template();
        let recipients = self.reward_recipients(killer, &npc.position())?;

        let exp = template.exp.saturating_mul(u64::from(exp_rate)) / 100;
        let share = exp / recipients.len().max(1) as u64;
        if share > 0 {
            for recipient in &recipients {
                self.award_exp(recipient, share)?;
            }
        }

        let rng = self.oracles.rng();
        for entry in &template.loot {
            let chance = (u64::from(entry.chance_pct) * u64::from(drop_rate) / 100).min(100) as u32;
            if !rng.chance(chance) {
                continue;
            }
            let pick = rng.range(0, recipients.len().saturating_sub(1) as u32) as usize;
            let recipient = recipients.get(pick).unwrap_or(killer);
            self.deliver_loot(
                recipient,
                InventorySlot::new(entry.item, entry.quantity),
                npc.position(),
            )?;
        }
        Ok(())
    }

    /// The killer alone, or every live party member near `position`.
    fn reward_recipients(
        &self,
        killer: &Arc<LiveCharacter>,
        position: &Position,
    ) -> Result<Vec<Arc<LiveCharacter>>> {
        if self.parties.mode(killer.id())? != DistributionMode::PartyShared {
            return Ok(vec![Arc::clone(killer)]);
        }
        let mut recipients = Vec::new();
        for member in self.parties.members(killer.id())? {
            let Some(live) = self.characters.get(member)? else {
                continue;
            };
            let near = live
                .record()?
                .position
                .within(position, self.config.visibility_radius);
            if near && live.is_alive()? {
                recipients.push(live);
            }
        }
        if recipients.is_empty() {
            recipients.push(Arc::clone(killer));
        }
        Ok(recipients)
    }

    /// Puts loot in the pack; if it does not fit it lands on the ground
    /// reserved for the recipient.
    fn deliver_loot(&self, live: &LiveCharacter, stack: InventorySlot, position: Position) -> Result<()> {
        let mut inventory = live.inventory(self.inventory_repo())?;
        let context = live.slot_context()?;
        match inventory.add_item(
            stack.clone(),
            None,
            true,
            context,
            self.oracles.items.as_ref(),
            &self.config.game,
        ) {
            Ok(outcome) => {
                self.finish_slot_change(live, &inventory, outcome.touched, outcome.stats_dirty)?;
            }
            Err(ActionError::Rejected(rejection)) => {
                drop(inventory);
                debug!(character = %live.id(), ?rejection, "loot does not fit, dropping");
                self.spill(stack, position, Some(live.id()))?;
            }
            Err(ActionError::Lookup(error)) => {
                warn!(character = %live.id(), item = ?stack.item, %error, "loot lookup failed");
            }
        }
        Ok(())
    }

    /// Leaves `stack` on the ground.
    pub(crate) fn spill(
        &self,
        stack: InventorySlot,
        position: Position,
        owner: Option<CharacterId>,
    ) -> Result<()> {
        let item = stack.item;
        let expires_at = Epoch(self.now().0.saturating_add(self.config.game.drop_despawn_secs));
        let drop = self.drops.spawn(stack, position, owner, expires_at)?;
        self.publish_at(
            &position,
            GameEvent::DropSpawned {
                drop: drop.id,
                item,
                position,
            },
        )
    }

    fn schedule_npc_respawn(self: &Arc<Self>, npc: &Arc<LiveNpc>) -> Result<()> {
        let (min, max) = npc.template().respawn_secs;
        let secs = |value: u64| u32::try_from(value).unwrap_or(u32::MAX);
        let delay = u64::from(self.oracles.rng().range(secs(min), secs(max)));
        let at = Epoch(self.now().0 + delay);
        if !npc.with_life(|life| life.schedule_respawn(at))? {
            return Ok(());
        }

        let world: Weak<World> = Arc::downgrade(self);
        let npc_id = npc.id();
        self.scheduler
            .schedule_once(Duration::from_secs(delay), async move {
                let Some(world) = world.upgrade() else {
                    return;
                };
                if let Err(error) = world.respawn_npc(npc_id) {
                    warn!(npc = ?npc_id, %error, "npc respawn failed");
                }
            })
    }

    fn respawn_npc(&self, id: NpcInstanceId) -> Result<()> {
        let Some(npc) = self.npcs.get(id)? else {
            return Ok(());
        };
        if !npc.respawn()? {
            return Ok(());
        }
        debug!(npc = ?id, "npc respawned");
        self.publish_at(
            &npc.position(),
            GameEvent::NpcRespawned {
                npc: id,
                position: npc.position(),
            },
        )
    }

    /// Death of a character: injury, buff losses, dropped flags, duel end
    /// and the respawn countdown.
    pub(crate) fn player_death(
        self: &Arc<Self>,
        victim: &Arc<LiveCharacter>,
        killer: Option<Combatant>,
    ) -> Result<()> {
        if !victim.life()?.die() {
            return Ok(());
        }
        info!(character = %victim.id(), ?killer, "character died");
        victim.insert_flags(CharacterFlags::RESPAWNING);

        {
            let mut record = victim.record_mut()?;
            record.injury = record
                .injury
                .saturating_add(self.config.game.injury_per_death)
                .min(self.config.game.max_injury);
        }

        victim
            .buffs_mut()?
            .force_expire(&self.config.game.death_expired_buffs);
        let clock = victim.clock(self.now());
        self.expire_buffs(victim, &clock)?;

        self.drop_flag_items(victim)?;
        self.end_duel(victim)?;
        self.refresh_stats(victim)?;
        victim.mark_dirty();

        self.publish_near(
            victim,
            GameEvent::Died {
                victim: Combatant::Character(victim.id()),
                killer,
            },
        )?;
        self.schedule_character_respawn(victim)
    }

    fn drop_flag_items(&self, victim: &LiveCharacter) -> Result<()> {
        let _replace = victim.replace_guard()?;
        let mut inventory = victim.inventory(self.inventory_repo())?;
        let dropped = inventory.remove_where(|slot| self.config.game.is_flag_item(slot.item));
        if dropped.is_empty() {
            return Ok(());
        }
        let position = victim.record()?.position;
        let touched: Vec<_> = dropped.iter().map(|(index, _)| *index).collect();
        self.finish_slot_change(victim, &inventory, touched, true)?;
        drop(inventory);

        for (_, stack) in dropped {
            debug!(character = %victim.id(), item = ?stack.item, "flag item dropped on death");
            self.spill(stack, position, None)?;
        }
        Ok(())
    }

    /// Ends `loser`'s duel, if any, in favour of the opponent.
    pub(crate) fn end_duel(&self, loser: &LiveCharacter) -> Result<()> {
        let Some(opponent) = loser.duel()?.take() else {
            return Ok(());
        };
        if let Some(winner) = self.characters.get(opponent)? {
            let mut partner = winner.duel()?;
            if *partner == Some(loser.id()) {
                *partner = None;
            }
        }
        self.publish_near(
            loser,
            GameEvent::DuelEnded {
                winner: opponent,
                loser: loser.id(),
            },
        )
    }

    fn schedule_character_respawn(self: &Arc<Self>, victim: &Arc<LiveCharacter>) -> Result<()> {
        let delay = self.config.game.player_respawn_secs;
        let until = Epoch(self.now().0 + delay);
        if !victim.life()?.begin_respawn(until) {
            return Ok(());
        }

        let world: Weak<World> = Arc::downgrade(self);
        let id = victim.id();
        self.scheduler
            .schedule_once(Duration::from_secs(delay), async move {
                let Some(world) = world.upgrade() else {
                    return;
                };
                if let Err(error) = world.respawn_character(id) {
                    warn!(character = %id, %error, "character respawn failed");
                }
            })
    }

    fn respawn_character(&self, id: CharacterId) -> Result<()> {
        let Some(live) = self.characters.get(id)? else {
            return Ok(());
        };
        if !live.is_online() || !live.life()?.revive() {
            return Ok(());
        }
        live.remove_flags(CharacterFlags::RESPAWNING);
        {
            let stats = live.stats()?;
            live.vitals().refill(stats.max_hp, stats.max_chi);
        }
        live.mark_dirty();
        info!(character = %id, "character respawned");
        self.publish_near(&live, GameEvent::CharacterRespawned { character: id })?;
        self.publish_vitals(&live)
    }
}
