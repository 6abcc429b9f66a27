//! Publish/subscribe abstraction (mechanics only).
//!
//! A bus fans out change values to every live subscription:
//!
//! - **Synchronous publish**: a store publishes right after it updates its state,
//!   on the caller's thread.
//! - **Broadcast**: each subscription gets its own copy of every change.
//! - **Unordered across subscribers**: consumers must not rely on which
//!   subscriber sees a change first.
//! - **No persistence**: changes published before `subscribe()` are not replayed.

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use storefront_core::SubscriptionId;

/// A subscription to a store's change stream.
///
/// ```ignore
/// let sub = cart.subscribe();
/// cart.add_to_cart(product);
///
/// for change in sub.drain() {
///     render(change);
/// }
/// ```
///
/// Dropping the subscription detaches it; the bus prunes it on the next publish.
/// `ChangeBus::unsubscribe` detaches it eagerly.
#[derive(Debug)]
pub struct Subscription<M> {
    id: SubscriptionId,
    receiver: Receiver<M>,
    // Holds a message pulled off the channel by `is_disconnected`.
    peeked: RefCell<Option<M>>,
}

impl<M> Subscription<M> {
    pub fn new(id: SubscriptionId, receiver: Receiver<M>) -> Self {
        Self {
            id,
            receiver,
            peeked: RefCell::new(None),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, RecvError> {
        match self.peeked.borrow_mut().take() {
            Some(message) => Ok(message),
            None => self.receiver.recv(),
        }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        match self.peeked.borrow_mut().take() {
            Some(message) => Ok(message),
            None => self.receiver.try_recv(),
        }
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, RecvTimeoutError> {
        match self.peeked.borrow_mut().take() {
            Some(message) => Ok(message),
            None => self.receiver.recv_timeout(timeout),
        }
    }

    /// Take every message that is already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        let mut messages: Vec<M> = self.peeked.borrow_mut().take().into_iter().collect();
        messages.extend(self.receiver.try_iter());
        messages
    }

    /// True once the bus has dropped this subscription (unsubscribed or closed)
    /// and no message is left to read.
    pub fn is_disconnected(&self) -> bool {
        let mut peeked = self.peeked.borrow_mut();
        if peeked.is_some() {
            return false;
        }
        match self.receiver.try_recv() {
            Ok(message) => {
                *peeked = Some(message);
                false
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => true,
        }
    }
}

/// Store-agnostic change bus.
///
/// The trait requires `Send + Sync` so a store handle can be shared between the
/// presentation layer and an in-flight catalog fetch.
pub trait ChangeBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;

    /// Detach a subscription. Returns `false` when the id was unknown.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Detach every subscription; later subscriptions are born disconnected.
    fn close(&self);

    fn subscriber_count(&self) -> usize;
}

impl<M, B> ChangeBus<M> for Arc<B>
where
    B: ChangeBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        (**self).unsubscribe(id)
    }

    fn close(&self) {
        (**self).close()
    }

    fn subscriber_count(&self) -> usize {
        (**self).subscriber_count()
    }
}
