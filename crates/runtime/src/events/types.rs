//! Event payloads published after observable state changes.

use mmo_core::{
    AttackOutcome, BuffTypeId, CharacterId, DropId, ItemId, NpcInstanceId, Position, SlotIndex,
};
use serde::{Deserialize, Serialize};

/// Either side of a fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combatant {
    Character(CharacterId),
    Npc(NpcInstanceId),
}

/// Who should receive an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// Only the owning connection.
    Owner(CharacterId),
    /// The acting character and everyone currently on its sight list.
    Near { observers: Vec<CharacterId> },
    /// Every connection on every server process.
    Global,
}

/// Semantic payload of a state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LoggedIn {
        character: CharacterId,
    },
    LoggedOut {
        character: CharacterId,
    },
    SlotsChanged {
        character: CharacterId,
        slots: Vec<SlotIndex>,
    },
    ItemShown {
        character: CharacterId,
        slot: SlotIndex,
        item: ItemId,
    },
    StatsChanged {
        character: CharacterId,
        max_hp: u32,
        max_chi: u32,
    },
    VitalsChanged {
        character: CharacterId,
        hp: u32,
        chi: u32,
    },
    GoldChanged {
        character: CharacterId,
        gold: u64,
    },
    BuffApplied {
        character: CharacterId,
        buff: BuffTypeId,
        refreshed: bool,
    },
    BuffExpired {
        character: CharacterId,
        buff: BuffTypeId,
    },
    Damage {
        attacker: Combatant,
        target: Combatant,
        outcome: AttackOutcome,
        damage: u32,
        remaining_hp: u32,
    },
    Died {
        victim: Combatant,
        killer: Option<Combatant>,
    },
    NpcRespawned {
        npc: NpcInstanceId,
        position: Position,
    },
    CharacterRespawned {
        character: CharacterId,
    },
    ExpGained {
        character: CharacterId,
        amount: u64,
    },
    LevelUp {
        character: CharacterId,
        level: u16,
    },
    DropSpawned {
        drop: DropId,
        item: ItemId,
        position: Position,
    },
    DropRemoved {
        drop: DropId,
    },
    DuelStarted {
        challenger: CharacterId,
        opponent: CharacterId,
    },
    DuelEnded {
        winner: CharacterId,
        loser: CharacterId,
    },
    PetUnsummoned {
        character: CharacterId,
    },
}

impl GameEvent {
    pub fn topic(&self) -> super::Topic {
        use super::Topic;
        match self {
            Self::LoggedIn { .. }
            | Self::LoggedOut { .. }
            | Self::SlotsChanged { .. }
            | Self::ItemShown { .. }
            | Self::StatsChanged { .. }
            | Self::VitalsChanged { .. }
            | Self::GoldChanged { .. }
            | Self::BuffApplied { .. }
            | Self::BuffExpired { .. }
            | Self::ExpGained { .. }
            | Self::LevelUp { .. }
            | Self::PetUnsummoned { .. } => Topic::Character,
            Self::Damage { .. }
            | Self::Died { .. }
            | Self::CharacterRespawned { .. }
            | Self::DuelStarted { .. }
            | Self::DuelEnded { .. } => Topic::Combat,
            Self::NpcRespawned { .. } | Self::DropSpawned { .. } | Self::DropRemoved { .. } => {
                Topic::World
            }
        }
    }
}

/// Payload plus fan-out scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub scope: Scope,
    pub payload: GameEvent,
}

impl Event {
    pub fn new(scope: Scope, payload: GameEvent) -> Self {
        Self { scope, payload }
    }

    pub fn owner(character: CharacterId, payload: GameEvent) -> Self {
        Self::new(Scope::Owner(character), payload)
    }

    pub fn near(observers: Vec<CharacterId>, payload: GameEvent) -> Self {
        Self::new(Scope::Near { observers }, payload)
    }

    pub fn global(payload: GameEvent) -> Self {
        Self::new(Scope::Global, payload)
    }

    pub fn topic(&self) -> super::Topic {
        self.payload.topic()
    }
}
