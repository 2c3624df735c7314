//! Topic-based event bus for runtime events.
//!
//! Every state change other players can observe is published as an [`Event`]
//! carrying a [`GameEvent`] payload and a fan-out [`Scope`].

mod bus;
mod types;

pub use bus::{Broadcaster, EventBus, Topic};
pub use types::{Combatant, Event, GameEvent, Scope};
