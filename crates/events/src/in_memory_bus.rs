//! In-memory change bus backed by `std::sync::mpsc` channels.

use std::sync::{Mutex, mpsc};

use storefront_core::SubscriptionId;
use thiserror::Error;

use crate::bus::{ChangeBus, Subscription};

#[derive(Debug, Error)]
pub enum NotifierError {
    /// Publish failed due to internal lock poisoning.
    #[error("subscriber list lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
struct Subscribers<M> {
    senders: Vec<(SubscriptionId, mpsc::Sender<M>)>,
    closed: bool,
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Best-effort fan-out; dead subscribers are dropped while publishing
#[derive(Debug)]
pub struct InMemoryChangeBus<M> {
    subscribers: Mutex<Subscribers<M>>,
}

impl<M> InMemoryChangeBus<M> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> Default for InMemoryChangeBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Subscribers {
                senders: Vec::new(),
                closed: false,
            }),
        }
    }
}

impl<M> ChangeBus<M> for InMemoryChangeBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = NotifierError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self.subscribers.lock().map_err(|_| NotifierError::Poisoned)?;

        // Drop any dead subscribers while publishing.
        subs.senders.retain(|(_, tx)| tx.send(message.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let id = SubscriptionId::new();
        let (tx, rx) = mpsc::channel();

        // A poisoned or closed bus still hands out a subscription; its sender
        // is dropped here so the receiver reports disconnection.
        match self.subscribers.lock() {
            Ok(mut subs) if !subs.closed => subs.senders.push((id, tx)),
            Ok(_) => tracing::debug!(subscription = %id, "subscribe on closed bus"),
            Err(_) => tracing::warn!(subscription = %id, "subscribe on poisoned bus"),
        }

        Subscription::new(id, rx)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut subs) = self.subscribers.lock() else {
            return false;
        };

        let before = subs.senders.len();
        subs.senders.retain(|(sub_id, _)| *sub_id != id);
        subs.senders.len() != before
    }

    fn close(&self) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.senders.clear();
            subs.closed = true;
        }
    }

    fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .map(|subs| subs.senders.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_receives_every_message() {
        let bus = InMemoryChangeBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(1u32).unwrap();
        bus.publish(2u32).unwrap();

        assert_eq!(a.drain(), vec![1, 2]);
        assert_eq!(b.drain(), vec![1, 2]);
    }

    #[test]
    fn messages_before_subscribe_are_not_replayed() {
        let bus = InMemoryChangeBus::new();
        bus.publish("early").unwrap();

        let sub = bus.subscribe();
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn unsubscribe_detaches_only_that_subscription() {
        let bus = InMemoryChangeBus::new();
        let kept = bus.subscribe();
        let dropped = bus.subscribe();

        assert!(bus.unsubscribe(dropped.id()));
        assert!(!bus.unsubscribe(dropped.id()));
        bus.publish(5u8).unwrap();

        assert_eq!(kept.drain(), vec![5]);
        assert!(dropped.is_disconnected());
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn dropped_subscriptions_are_pruned_on_publish() {
        let bus = InMemoryChangeBus::new();
        let sub = bus.subscribe();
        drop(sub);
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(()).unwrap();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn disconnect_check_keeps_queued_messages() {
        let bus = InMemoryChangeBus::new();
        let sub = bus.subscribe();
        bus.publish('a').unwrap();
        bus.publish('b').unwrap();
        bus.close();

        assert!(!sub.is_disconnected());
        assert_eq!(sub.try_recv().unwrap(), 'a');
        assert!(!sub.is_disconnected());
        assert_eq!(sub.drain(), vec!['b']);
        assert!(sub.is_disconnected());
    }

    #[test]
    fn close_disconnects_current_and_future_subscribers() {
        let bus = InMemoryChangeBus::new();
        let before = bus.subscribe();

        bus.close();
        let after = bus.subscribe();
        bus.publish(9i32).unwrap();

        assert!(before.is_disconnected());
        assert!(after.is_disconnected());
        assert_eq!(bus.subscriber_count(), 0);
    }
}
