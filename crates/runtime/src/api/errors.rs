//! Unified error types surfaced by the runtime API.
//!
//! Business-rule rejections are not errors: they come back inside an
//! [`ActionResult`](super::ActionResult). Only infrastructure failures end up
//! here.

use mmo_core::CharacterId;
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("a character lock was poisoned")]
    LockPoisoned,

    #[error("character {0} is not online")]
    UnknownCharacter(CharacterId),

    #[error("character {0} is already online")]
    AlreadyOnline(CharacterId),

    #[error("character name {0:?} is already taken")]
    NameTaken(String),

    #[error("no free pseudo id left")]
    PseudoIdsExhausted,

    #[error("persistence worker channel closed")]
    PersistenceChannelClosed,

    #[error("persistence worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error("invalid game data: {0}")]
    InvalidGameData(String),

    #[error(transparent)]
    Inventory(#[from] mmo_core::inventory::InventoryError),
}
