//! Outgoing notifications for the match controller and the sound collaborator.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tickshot_common::{PlayerId, Point};
use tracing::warn;

use crate::sound::SoundEvent;

/// Events produced while resolving a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A player was killed by a bullet
    AttackKill {
        /// Victim
        killed: PlayerId,
        /// Shooter
        shooter: PlayerId,
        /// Bullet position at the moment of the hit
        position: Point,
        /// Whether the lethal hit was a headshot
        headshot: bool,
    },
    /// A player died from landing too hard
    FallDamageKill {
        /// Victim
        killed: PlayerId,
    },
    /// A positioned sound
    Sound(SoundEvent),
}

impl SimEvent {
    /// Kills must reach the match controller; sounds may be shed.
    #[must_use]
    pub const fn is_kill(&self) -> bool {
        matches!(self, Self::AttackKill { .. } | Self::FallDamageKill { .. })
    }
}

/// Fire-and-forget event queue.
///
/// Sounds are dropped once `capacity` events are pending. Kills are always
/// queued, however far behind the consumer is.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for publishing events
    sender: Sender<SimEvent>,
    /// Receiver for collecting events
    receiver: Receiver<SimEvent>,
    /// Pending events above which sounds are dropped
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given sound capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event. A full bus drops sounds but never kills.
    pub fn publish(&self, event: SimEvent) {
        if !event.is_kill() && self.receiver.len() >= self.capacity {
            warn!(capacity = self.capacity, ?event, "event bus full, dropping event");
            return;
        }
        // The bus owns the receiver, so the channel never disconnects
        if let Err(err) = self.sender.send(event) {
            warn!(event = ?err.0, "event bus disconnected");
        }
    }

    /// Drains all pending events in publish order.
    pub fn drain(&self) -> Vec<SimEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the sound capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::SoundKind;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(4);
        bus.publish(SimEvent::FallDamageKill {
            killed: PlayerId::new(1),
        });
        bus.publish(SimEvent::FallDamageKill {
            killed: PlayerId::new(2),
        });
        assert_eq!(bus.pending_count(), 2);

        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                SimEvent::FallDamageKill {
                    killed: PlayerId::new(1)
                },
                SimEvent::FallDamageKill {
                    killed: PlayerId::new(2)
                },
            ]
        );
        assert_eq!(bus.pending_count(), 0);
    }

    fn step_sound() -> SimEvent {
        SimEvent::Sound(SoundEvent::new(Point::new(0, 0, 0), SoundKind::Step))
    }

    #[test]
    fn test_full_bus_drops_sounds() {
        let bus = EventBus::new(1);
        for _ in 0..3 {
            bus.publish(step_sound());
        }
        assert_eq!(bus.capacity(), 1);
        assert_eq!(bus.drain(), vec![step_sound()]);
    }

    #[test]
    fn test_full_bus_keeps_kills() {
        let bus = EventBus::new(2);
        for _ in 0..5 {
            bus.publish(step_sound());
        }
        for id in 0..3 {
            bus.publish(SimEvent::FallDamageKill {
                killed: PlayerId::new(id),
            });
        }
        bus.publish(step_sound());

        let events = bus.drain();
        assert_eq!(events.len(), 5);
        assert_eq!(events.iter().filter(|e| e.is_kill()).count(), 3);
        assert!(events[2..].iter().all(SimEvent::is_kill), "kills keep publish order");
    }
}
