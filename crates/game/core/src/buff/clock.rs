use crate::state::{Epoch, Tick};

/// Which time base a buff's timestamps are measured on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClockKind {
    /// Per-character logical tick counter. Pauses while the owner is offline.
    #[default]
    CharacterTick,
    /// Wall-clock seconds shared by the whole server.
    ServerEpoch,
}

/// Source of both time bases.
pub trait Clock {
    fn tick(&self) -> Tick;

    fn epoch(&self) -> Epoch;

    fn now(&self, kind: ClockKind) -> u64 {
        match kind {
            ClockKind::CharacterTick => self.tick().0,
            ClockKind::ServerEpoch => self.epoch().0,
        }
    }
}

/// Both clocks read at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockReading {
    pub tick: Tick,
    pub epoch: Epoch,
}

impl ClockReading {
    pub const fn new(tick: Tick, epoch: Epoch) -> Self {
        Self { tick, epoch }
    }
}

impl Clock for ClockReading {
    fn tick(&self) -> Tick {
        self.tick
    }

    fn epoch(&self) -> Epoch {
        self.epoch
    }
}
