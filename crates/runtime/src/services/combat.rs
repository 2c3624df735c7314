use std::sync::Arc;

use mmo_core::{
    AttackResult, AttackerProfile, CharacterFlags, CharacterId, DefenderProfile, HitKind,
    NpcInstanceId, Position, Rejection, SkillId, SkillKind, resolve_attack,
};
use tracing::{debug, warn};

use super::reject;
use crate::World;
use crate::api::{ActionResult, Result};
use crate::events::{Combatant, GameEvent};
use crate::live::{LiveCharacter, LiveNpc};

impl World {
    /// Plain weapon attack on an NPC.
    pub fn attack_npc(self: &Arc<Self>, id: CharacterId, npc: NpcInstanceId) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        if let Some(rejection) = self.action_gate(&live, false)? {
            return Ok(ActionResult::rejected(rejection));
        }
        let npc = match self.npc_target(&live, npc)? {
            Ok(npc) => npc,
            Err(result) => return Ok(result),
        };
        let Some(attacker) = self.attacker_profile(&live, HitKind::Physical)? else {
            return Ok(ActionResult::aborted());
        };
        self.strike_npc(&live, &npc, &attacker)
    }

    /// Plain weapon attack on another character. Requires hostile factions
    /// or an ongoing duel between the two.
    pub fn attack_player(self: &Arc<Self>, id: CharacterId, target: CharacterId) -> Result<ActionResult> {
        let live = self.characters.require(id)?;
        if let Some(rejection) = self.action_gate(&live, false)? {
            return Ok(ActionResult::rejected(rejection));
        }
        let target = match self.player_target(&live, target)? {
            Ok(target) => target,
            Err(result) => return Ok(result),
        };
        let Some(attacker) = self.attacker_profile(&live, HitKind::Physical)? else {
            return Ok(ActionResult::aborted());
        };
        self.strike_player(&live, &target, &attacker)
    }

    /// Casts a buff skill on `target` (possibly the caster).
    pub fn cast_buff_skill(
        self: &Arc<Self>,
        caster: CharacterId,
        target: CharacterId,
        skill: SkillId,
    ) -> Result<ActionResult> {
        let live = self.characters.require(caster)?;
        if let Some(rejection) = self.action_gate(&live, true)? {
            return Ok(ActionResult::rejected(rejection));
        }
        let Some(plus) = live.record()?.skill_plus(skill) else {
            return Ok(ActionResult::rejected(Rejection::SkillNotLearned));
        };
        let definition = match self.env().skill(skill) {
            Ok(definition) => definition,
            Err(error) => return Ok(reject(error.into(), caster, "cast_buff_skill")),
        };
        let SkillKind::Buff { buff } = definition.kind else {
            return Ok(ActionResult::rejected(Rejection::InvalidTarget));
        };

        let target = if target == caster {
            Arc::clone(&live)
        } else {
            let Some(target) = self.characters.get(target)? else {
                return Ok(ActionResult::rejected(Rejection::InvalidTarget));
            };
            let position = target.record()?.position;
            if !self.in_reach(&live, &position)? {
                return Ok(ActionResult::rejected(Rejection::OutOfRange));
            }
            target
        };
        if !target.is_alive()? {
            return Ok(ActionResult::rejected(Rejection::InvalidTarget));
        }
        if !live.vitals().spend_chi(definition.chi_cost) {
            return Ok(ActionResult::rejected(Rejection::InsufficientChi));
        }
        self.publish_vitals(&live)?;

        debug!(%caster, target = %target.id(), ?skill, "buff skill cast");
        let stats = match self.grant_buff(&target, buff, plus)? {
            Some(_) if Arc::ptr_eq(&live, &target) => Some(live.stats()?.clone()),
            _ => None,
        };
        Ok(ActionResult::success().with_stats(stats))
    }

    /// Casts an attack skill. Hits on characters may inflict the skill's
    /// status effect.
    pub fn cast_attack_skill(
        self: &Arc<Self>,
        caster: CharacterId,
        target: Combatant,
        skill: SkillId,
    ) -> Result<ActionResult> {
        let live = self.characters.require(caster)?;
        if let Some(rejection) = self.action_gate(&live, true)? {
            return Ok(ActionResult::rejected(rejection));
        }
        let Some(plus) = live.record()?.skill_plus(skill) else {
            return Ok(ActionResult::rejected(Rejection::SkillNotLearned));
        };
        let definition = match self.env().skill(skill) {
            Ok(definition) => definition,
            Err(error) => return Ok(reject(error.into(), caster, "cast_attack_skill")),
        };
        let SkillKind::Attack {
            multiplier_pct,
            inflicts,
            chance_pct,
        } = definition.kind
        else {
            return Ok(ActionResult::rejected(Rejection::InvalidTarget));
        };

        match target {
            Combatant::Npc(npc) => {
                let npc = match self.npc_target(&live, npc)? {
                    Ok(npc) => npc,
                    Err(result) => return Ok(result),
                };
                if !live.vitals().spend_chi(definition.chi_cost) {
                    return Ok(ActionResult::rejected(Rejection::InsufficientChi));
                }
                let Some(attacker) = self.attacker_profile(&live, HitKind::Arts)? else {
                    return Ok(ActionResult::aborted());
                };
                self.publish_vitals(&live)?;
                self.strike_npc(&live, &npc, &attacker.with_multiplier(multiplier_pct))
            }
            Combatant::Character(target) => {
                let target = match self.player_target(&live, target)? {
                    Ok(target) => target,
                    Err(result) => return Ok(result),
                };
                if !live.vitals().spend_chi(definition.chi_cost) {
                    return Ok(ActionResult::rejected(Rejection::InsufficientChi));
                }
                let Some(attacker) = self.attacker_profile(&live, HitKind::Arts)? else {
                    return Ok(ActionResult::aborted());
                };
                self.publish_vitals(&live)?;
                let result =
                    self.strike_player(&live, &target, &attacker.with_multiplier(multiplier_pct))?;

                let hit = result.attack.is_some_and(|attack| attack.is_hit());
                if hit
                    && let Some(status) = inflicts
                    && target.is_alive()?
                    && self.oracles.rng().chance(chance_pct)
                {
                    debug!(%caster, target = %target.id(), ?status, "status inflicted");
                    self.grant_buff(&target, status, plus)?;
                }
                Ok(result)
            }
        }
    }

    /// Dead, respawning and paralysed characters cannot act; confused ones
    /// cannot cast.
    fn action_gate(&self, live: &LiveCharacter, casting: bool) -> Result<Option<Rejection>> {
        if !live.is_alive()? {
            return Ok(Some(Rejection::CannotAct));
        }
        let flags = live.flags();
        if !flags.can_act() {
            return Ok(Some(Rejection::CannotAct));
        }
        if casting && !flags.can_cast() {
            return Ok(Some(Rejection::CannotCast));
        }
        Ok(None)
    }

    fn in_reach(&self, live: &LiveCharacter, position: &Position) -> Result<bool> {
        Ok(live
            .record()?
            .position
            .within(position, self.config.visibility_radius))
    }

    fn npc_target(
        &self,
        live: &LiveCharacter,
        npc: NpcInstanceId,
    ) -> Result<std::result::Result<Arc<LiveNpc>, ActionResult>> {
        let Some(target) = self.npcs.get(npc)? else {
            warn!(character = %live.id(), ?npc, "attack on unknown npc aborted");
            return Ok(Err(ActionResult::aborted()));
        };
        if !target.is_alive()? {
            return Ok(Err(ActionResult::rejected(Rejection::InvalidTarget)));
        }
        if !self.in_reach(live, &target.position())? {
            return Ok(Err(ActionResult::rejected(Rejection::OutOfRange)));
        }
        Ok(Ok(target))
    }

    fn player_target(
        &self,
        live: &LiveCharacter,
        target: CharacterId,
    ) -> Result<std::result::Result<Arc<LiveCharacter>, ActionResult>> {
        if target == live.id() {
            return Ok(Err(ActionResult::rejected(Rejection::InvalidTarget)));
        }
        let Some(target) = self.characters.get(target)? else {
            return Ok(Err(ActionResult::rejected(Rejection::InvalidTarget)));
        };
        if !target.is_alive()? || target.flags().contains(CharacterFlags::RESPAWNING) {
            return Ok(Err(ActionResult::rejected(Rejection::InvalidTarget)));
        }
        let position = target.record()?.position;
        if !self.in_reach(live, &position)? {
            return Ok(Err(ActionResult::rejected(Rejection::OutOfRange)));
        }
        if !self.hostile(live, &target)? {
            return Ok(Err(ActionResult::rejected(Rejection::NotHostile)));
        }
        Ok(Ok(target))
    }

    fn hostile(&self, live: &LiveCharacter, target: &LiveCharacter) -> Result<bool> {
        if *live.duel()? == Some(target.id()) {
            return Ok(true);
        }
        let own = live.record()?.faction;
        let theirs = target.record()?.faction;
        Ok(own.is_hostile_to(theirs))
    }

    /// Recomputes the attacker's stats and builds its profile from them.
    fn attacker_profile(&self, live: &LiveCharacter, kind: HitKind) -> Result<Option<AttackerProfile>> {
        let Some(stats) = self.refresh_stats(live)? else {
            return Ok(None);
        };
        let level = live.record()?.level;
        let invisible = live.flags().contains(CharacterFlags::INVISIBLE);
        Ok(Some(
            AttackerProfile::from_stats(level, &stats, kind).invisible(invisible),
        ))
    }

    fn strike_npc(
        self: &Arc<Self>,
        live: &Arc<LiveCharacter>,
        npc: &Arc<LiveNpc>,
        attacker: &AttackerProfile,
    ) -> Result<ActionResult> {
        let defender = DefenderProfile::npc(npc.template(), npc.vitals().hp());
        let result = resolve_attack(attacker, &defender, self.oracles.rng(), &self.config.game);

        live.mark_attack(self.now());
        live.set_target(Some(Combatant::Npc(npc.id())))?;
        let applied = npc.vitals().damage(result.damage);
        self.publish_near(
            live,
            GameEvent::Damage {
                attacker: Combatant::Character(live.id()),
                target: Combatant::Npc(npc.id()),
                outcome: result.outcome,
                damage: applied.dealt,
                remaining_hp: applied.remaining,
            },
        )?;

        if applied.lethal {
            self.npc_death(npc, Some(live))?;
        }
        self.settle_exchange(live, &result, Combatant::Npc(npc.id()))?;
        Ok(ActionResult::success().with_attack(result))
    }

    fn strike_player(
        self: &Arc<Self>,
        live: &Arc<LiveCharacter>,
        target: &Arc<LiveCharacter>,
        attacker: &AttackerProfile,
    ) -> Result<ActionResult> {
        let level = target.record()?.level;
        let defender = {
            let stats = target.stats()?;
            DefenderProfile::player(level, &stats, attacker.kind, target.vitals().hp())
        };
        let result = resolve_attack(attacker, &defender, self.oracles.rng(), &self.config.game);

        live.mark_attack(self.now());
        live.set_target(Some(Combatant::Character(target.id())))?;
        let applied = target.vitals().damage(result.damage);
        self.publish_near(
            live,
            GameEvent::Damage {
                attacker: Combatant::Character(live.id()),
                target: Combatant::Character(target.id()),
                outcome: result.outcome,
                damage: applied.dealt,
                remaining_hp: applied.remaining,
            },
        )?;

        if applied.lethal {
            self.player_death(target, Some(Combatant::Character(live.id())))?;
        }
        self.settle_exchange(live, &result, Combatant::Character(target.id()))?;
        Ok(ActionResult::success().with_attack(result))
    }

    /// Reflected damage hurts the attacker; absorbed damage heals it.
    fn settle_exchange(
        self: &Arc<Self>,
        live: &Arc<LiveCharacter>,
        result: &AttackResult,
        source: Combatant,
    ) -> Result<()> {
        if result.reflected == 0 && result.absorbed == 0 {
            return Ok(());
        }
        let max_hp = live.stats()?.max_hp;
        live.vitals().heal(result.absorbed, max_hp);
        let reflected = live.vitals().damage(result.reflected);
        self.publish_vitals(live)?;
        if reflected.lethal {
            self.player_death(live, Some(source))?;
        }
        Ok(())
    }
}
