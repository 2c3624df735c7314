//! Background tasks that back the runtime.
//!
//! The persistence worker owns the repositories' write side, tick tasks
//! drive each character and pet, the visibility task maintains sight sets
//! and the scheduler runs delayed continuations.

mod persistence;
mod scheduler;
mod tick;
mod visibility;

pub use persistence::{DirtySet, PersistRequest, PersistenceHandle, PersistenceWorker, RetryPolicy};
pub use scheduler::Scheduler;

pub(crate) use tick::{spawn_character_tick, spawn_pet_tick};
pub(crate) use visibility::spawn_visibility;
