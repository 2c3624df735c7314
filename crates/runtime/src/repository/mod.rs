//! Persistence adapters for character state.
//!
//! The runtime treats storage as write-behind: memory is authoritative while
//! a character is online and repositories only see snapshots.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileCharacterStore;
pub use memory::InMemoryCharacterStore;
pub use traits::{CharacterRepository, CharacterSnapshot, InventoryRepository};
