use super::common::Epoch;

/// Life cycle of a combat target.
///
/// NPCs go `Alive → Dead → RespawnScheduled → Alive`; players go
/// `Alive → Dead → Respawning → Alive`. Only `Alive` targets can be hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
    RespawnScheduled {
        at: Epoch,
    },
    Respawning {
        until: Epoch,
    },
}

impl LifeState {
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Alive)
    }

    /// `Alive → Dead`. Returns false if the target was already dead, so the
    /// death side effects run exactly once.
    pub fn die(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        *self = Self::Dead;
        true
    }

    /// `Dead → RespawnScheduled` (NPCs).
    pub fn schedule_respawn(&mut self, at: Epoch) -> bool {
        if *self != Self::Dead {
            return false;
        }
        *self = Self::RespawnScheduled { at };
        true
    }

    /// `Dead → Respawning` (players).
    pub fn begin_respawn(&mut self, until: Epoch) -> bool {
        if *self != Self::Dead {
            return false;
        }
        *self = Self::Respawning { until };
        true
    }

    /// Back to `Alive` from either respawn state.
    pub fn revive(&mut self) -> bool {
        match self {
            Self::RespawnScheduled { .. } | Self::Respawning { .. } => {
                *self = Self::Alive;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_happens_once() {
        let mut state = LifeState::Alive;
        assert!(state.die());
        assert!(!state.die());
        assert_eq!(state, LifeState::Dead);
    }

    #[test]
    fn npc_cycle() {
        let mut state = LifeState::Alive;
        assert!(!state.schedule_respawn(Epoch(5)));
        state.die();
        assert!(state.schedule_respawn(Epoch(5)));
        assert!(!state.is_alive());
        assert!(state.revive());
        assert!(state.is_alive());
    }

    #[test]
    fn player_cycle() {
        let mut state = LifeState::Alive;
        state.die();
        assert!(state.begin_respawn(Epoch(10)));
        assert!(!state.die());
        assert!(state.revive());
    }
}
