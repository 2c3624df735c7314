//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::Event;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Inventory, stats, buffs, progression of one character
    Character,
    /// Damage, deaths, respawns, duels
    Combat,
    /// NPC respawns and ground drops
    World,
}

/// Outbound fan-out transport.
///
/// The runtime publishes semantic events here; delivery to subscribers,
/// other server processes or connections is the implementor's business.
pub trait Broadcaster: Send + Sync {
    fn publish(&self, event: Event);
}

/// In-process topic bus on top of tokio broadcast channels.
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; slow subscribers lag.
#[derive(Clone, Debug)]
pub struct EventBus {
    character: broadcast::Sender<Event>,
    combat: broadcast::Sender<Event>,
    world: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(1_024)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            character: broadcast::channel(capacity).0,
            combat: broadcast::channel(capacity).0,
            world: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Character => &self.character,
            Topic::Combat => &self.combat,
            Topic::World => &self.world,
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster for EventBus {
    fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEvent;
    use mmo_core::CharacterId;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut character = bus.subscribe(Topic::Character);
        let mut combat = bus.subscribe(Topic::Combat);

        bus.publish(Event::owner(
            CharacterId(1),
            GameEvent::LoggedIn {
                character: CharacterId(1),
            },
        ));

        let received = character.recv().await.unwrap();
        assert_eq!(received.topic(), Topic::Character);
        assert!(combat.try_recv().is_err());
    }
}
