use crate::buff::{BuffSpecial, ClockKind};
use crate::state::BuffTypeId;
use crate::stats::StatDelta;

/// Read-only buff-type catalogue.
pub trait BuffOracle: Send + Sync {
    fn definition(&self, id: BuffTypeId) -> Option<BuffDefinition>;
}

/// Static description of a buff type.
///
/// Every definition names the clock its timestamps are measured on, so a
/// gameplay buff measured in character ticks and a world event measured in
/// server seconds never get compared against each other.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffDefinition {
    pub id: BuffTypeId,
    pub clock: ClockKind,
    /// Length in units of `clock`. `0` means the buff never expires on its own.
    pub duration: u64,
    /// Overrides the default expiry rule (`duration > 0`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub can_expire: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub delta: StatDelta,
    /// Grant added per plus level of the granting skill.
    #[cfg_attr(feature = "serde", serde(default))]
    pub per_plus: StatDelta,
    #[cfg_attr(feature = "serde", serde(default))]
    pub special: BuffSpecial,
}

impl BuffDefinition {
    pub fn new(id: BuffTypeId, clock: ClockKind, duration: u64) -> Self {
        Self {
            id,
            clock,
            duration,
            can_expire: None,
            delta: StatDelta::ZERO,
            per_plus: StatDelta::ZERO,
            special: BuffSpecial::None,
        }
    }

    #[must_use]
    pub fn with_delta(mut self, delta: StatDelta) -> Self {
        self.delta = delta;
        self
    }

    #[must_use]
    pub fn with_per_plus(mut self, per_plus: StatDelta) -> Self {
        self.per_plus = per_plus;
        self
    }

    #[must_use]
    pub fn with_special(mut self, special: BuffSpecial) -> Self {
        self.special = special;
        self
    }

    #[must_use]
    pub fn with_can_expire(mut self, can_expire: bool) -> Self {
        self.can_expire = Some(can_expire);
        self
    }

    /// Whether instances of this buff are removed when their time runs out.
    pub fn expires(&self) -> bool {
        self.can_expire.unwrap_or(self.duration > 0)
    }

    /// Stat grant of an instance cast at the given plus level.
    pub fn delta_at(&self, plus: u8) -> StatDelta {
        StatDelta::scaled(&self.delta, &self.per_plus, plus)
    }
}
