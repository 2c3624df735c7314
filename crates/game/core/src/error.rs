//! Common error infrastructure for mmo-core.
//!
//! Business-rule rejections ([`Rejection`]) and lookup failures
//! ([`OracleError`](crate::env::OracleError)) are kept apart: the first is
//! surfaced to the player as a short message, the second is a data-integrity
//! issue that is logged and otherwise swallowed by the caller.

use crate::env::OracleError;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: may succeed later without changes (e.g. inventory full)
/// - **Validation**: invalid input, should not retry without changes
/// - **Internal**: unexpected inconsistency such as a missing definition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all mmo-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier of the variant, for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A business-rule violation. The action is a no-op and the player sees
/// [`Rejection::message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("Not enough inventory space.")]
    InsufficientSpace,
    #[error("That item cannot be placed there.")]
    WrongSlotClass,
    #[error("That item is in use.")]
    ItemInUse,
    #[error("Invalid slot.")]
    InvalidSlot,
    #[error("That slot is occupied.")]
    SlotOccupied,
    #[error("That slot is empty.")]
    EmptySlot,
    #[error("Not enough items.")]
    InsufficientQuantity,
    #[error("Those items cannot be stacked.")]
    NotStackable,
    #[error("That stack is full.")]
    StackFull,
    #[error("Items cannot be moved between those storages.")]
    TransferNotAllowed,
    #[error("Open the matching storage first.")]
    StorageClosed,
    #[error("Not enough gold.")]
    InsufficientGold,
    #[error("You cannot carry more gold.")]
    GoldOverflow,
    #[error("That item cannot be sold.")]
    NotSellable,
    #[error("That item cannot be used.")]
    NotUsable,
    #[error("You are already at full strength.")]
    AlreadyFull,
    #[error("You cannot act right now.")]
    CannotAct,
    #[error("You cannot cast skills right now.")]
    CannotCast,
    #[error("You have not learned that skill.")]
    SkillNotLearned,
    #[error("Not enough CHI.")]
    InsufficientChi,
    #[error("Invalid target.")]
    InvalidTarget,
    #[error("That target is not hostile.")]
    NotHostile,
    #[error("Target is out of range.")]
    OutOfRange,
    #[error("Already in a duel.")]
    AlreadyInDuel,
}

impl Rejection {
    /// Short user-visible informational message.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl GameError for Rejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientSpace
            | Self::StackFull
            | Self::InsufficientGold
            | Self::InsufficientChi
            | Self::CannotAct
            | Self::CannotCast
            | Self::OutOfRange
            | Self::AlreadyFull => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientSpace => "REJECT_INSUFFICIENT_SPACE",
            Self::WrongSlotClass => "REJECT_WRONG_SLOT_CLASS",
            Self::ItemInUse => "REJECT_ITEM_IN_USE",
            Self::InvalidSlot => "REJECT_INVALID_SLOT",
            Self::SlotOccupied => "REJECT_SLOT_OCCUPIED",
            Self::EmptySlot => "REJECT_EMPTY_SLOT",
            Self::InsufficientQuantity => "REJECT_INSUFFICIENT_QUANTITY",
            Self::NotStackable => "REJECT_NOT_STACKABLE",
            Self::StackFull => "REJECT_STACK_FULL",
            Self::TransferNotAllowed => "REJECT_TRANSFER_NOT_ALLOWED",
            Self::StorageClosed => "REJECT_STORAGE_CLOSED",
            Self::InsufficientGold => "REJECT_INSUFFICIENT_GOLD",
            Self::GoldOverflow => "REJECT_GOLD_OVERFLOW",
            Self::NotSellable => "REJECT_NOT_SELLABLE",
            Self::NotUsable => "REJECT_NOT_USABLE",
            Self::AlreadyFull => "REJECT_ALREADY_FULL",
            Self::CannotAct => "REJECT_CANNOT_ACT",
            Self::CannotCast => "REJECT_CANNOT_CAST",
            Self::SkillNotLearned => "REJECT_SKILL_NOT_LEARNED",
            Self::InsufficientChi => "REJECT_INSUFFICIENT_CHI",
            Self::InvalidTarget => "REJECT_INVALID_TARGET",
            Self::NotHostile => "REJECT_NOT_HOSTILE",
            Self::OutOfRange => "REJECT_OUT_OF_RANGE",
            Self::AlreadyInDuel => "REJECT_ALREADY_IN_DUEL",
        }
    }
}

/// Failure of a rule-level operation: either a rejection or a lookup failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("lookup failed: {0}")]
    Lookup(#[from] OracleError),
}

impl ActionError {
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(rejection) => Some(*rejection),
            Self::Lookup(_) => None,
        }
    }
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Rejected(rejection) => rejection.severity(),
            Self::Lookup(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(rejection) => rejection.error_code(),
            Self::Lookup(error) => error.error_code(),
        }
    }
}
