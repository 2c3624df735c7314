//! Injectable registries of live world entities.
//!
//! One instance of each lives in the runtime's world; tests build isolated
//! ones. `clear` is called at shutdown.

mod characters;
mod drops;
mod npcs;

pub use characters::CharacterRegistry;
pub use drops::{DropRegistry, GroundDrop};
pub use npcs::NpcRegistry;
