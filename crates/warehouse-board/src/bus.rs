//! Board event bus.
//!
//! Named events flow from the HUD (and the host page) to the viewport without
//! either side holding a reference to the other. Every event is dispatched on
//! a [`Target`]:
//!
//! - `Viewport`: the board's own channel
//! - `Window`: the global channel, mirrored by DOM `CustomEvent`s in the browser
//!
//! A [`Subscription`] covers one or more targets and is drained once per frame.
//! Dispatch never blocks: if a subscriber's buffer is full the event is dropped
//! and counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use agrolink_types::BoardEvent;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde_json::Value;

/// Per-subscriber buffer. Far more than one frame's worth of input.
const SUBSCRIBER_BUFFER: usize = 256;

/// Channel an event is dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Viewport,
    Window,
}

struct Subscriber {
    targets: Vec<Target>,
    sender: Sender<BoardEvent>,
}

#[derive(Default)]
struct Inner {
    subscribers: Mutex<Vec<Subscriber>>,
    dropped: AtomicU64,
}

/// Cloneable handle to the bus.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribers = self.inner.subscribers.lock().map(|s| s.len()).unwrap_or(0);
        f.debug_struct("EventBus")
            .field("subscribers", &subscribers)
            .field("dropped", &self.dropped())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event dispatched on any of `targets` from now on.
    pub fn subscribe(&self, targets: &[Target]) -> Subscription {
        let (sender, receiver) = bounded(SUBSCRIBER_BUFFER);
        if let Ok(mut subscribers) = self.inner.subscribers.lock() {
            subscribers.push(Subscriber {
                targets: targets.to_vec(),
                sender,
            });
        }
        Subscription { receiver }
    }

    /// Deliver `event` to every subscriber of `target`. Never blocks.
    ///
    /// Returns the number of subscribers that received it.
    pub fn dispatch(&self, target: Target, event: BoardEvent) -> usize {
        let Ok(mut subscribers) = self.inner.subscribers.lock() else {
            return 0;
        };

        let mut delivered = 0;
        subscribers.retain(|sub| {
            if !sub.targets.contains(&target) {
                return true;
            }
            match sub.sender.try_send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    self.inner.dropped.fetch_add(1, Ordering::Relaxed);
                    true
                }
                // Subscription dropped
                Err(TrySendError::Disconnected(_)) => false,
            }
        });

        tracing::trace!(?target, event = event.name(), delivered, "board event dispatched");
        delivered
    }

    /// Decode and dispatch a named event. Malformed events are ignored.
    pub fn dispatch_named(&self, target: Target, name: &str, detail: &Value) -> bool {
        match BoardEvent::from_named(name, detail) {
            Some(event) => {
                self.dispatch(target, event);
                true
            }
            None => {
                tracing::debug!(name, %detail, "ignoring malformed board event");
                false
            }
        }
    }

    /// Events dropped because a subscriber's buffer was full.
    pub fn dropped(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }
}

/// Receiving end of [`EventBus::subscribe`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<BoardEvent>,
}

impl Subscription {
    /// All events received since the last drain, oldest first.
    pub fn drain(&self) -> Vec<BoardEvent> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrolink_types::{ControlKind, FocusRequest, EVENT_CONTROL};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn routes_by_target() {
        let bus = EventBus::new();
        let viewport = bus.subscribe(&[Target::Viewport]);
        let both = bus.subscribe(&[Target::Viewport, Target::Window]);

        bus.dispatch(Target::Window, BoardEvent::Control(ControlKind::ZoomIn));
        bus.dispatch(Target::Viewport, BoardEvent::Control(ControlKind::Reset));

        assert_eq!(
            viewport.drain(),
            vec![BoardEvent::Control(ControlKind::Reset)]
        );
        assert_eq!(
            both.drain(),
            vec![
                BoardEvent::Control(ControlKind::ZoomIn),
                BoardEvent::Control(ControlKind::Reset),
            ]
        );
        assert!(both.drain().is_empty());
    }

    #[test]
    fn dropped_subscription_is_pruned() {
        let bus = EventBus::new();
        let keep = bus.subscribe(&[Target::Window]);
        drop(bus.subscribe(&[Target::Window]));

        let event = BoardEvent::Focus(FocusRequest::new(1.0, 2.0));
        assert_eq!(bus.dispatch(Target::Window, event.clone()), 1);
        assert_eq!(keep.drain(), vec![event]);
    }

    #[test]
    fn full_buffer_drops_instead_of_blocking() {
        let bus = EventBus::new();
        let _slow = bus.subscribe(&[Target::Viewport]);
        for _ in 0..SUBSCRIBER_BUFFER + 5 {
            bus.dispatch(Target::Viewport, BoardEvent::Control(ControlKind::ZoomOut));
        }
        assert_eq!(bus.dropped(), 5);
    }

    #[test]
    fn dispatch_named_ignores_malformed() {
        let bus = EventBus::new();
        let sub = bus.subscribe(&[Target::Window]);

        assert!(!bus.dispatch_named(Target::Window, EVENT_CONTROL, &json!({ "type": 3 })));
        assert!(bus.dispatch_named(Target::Window, EVENT_CONTROL, &json!({ "type": "zoomIn" })));
        assert_eq!(sub.drain(), vec![BoardEvent::Control(ControlKind::ZoomIn)]);
    }
}
