//! Session change stream shared by every [`crate::SessionStore`] implementation.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{FutureExt, Stream, StreamExt};

use crate::models::{AuthEvent, Session};

/// One item on the change stream. `None` means nobody is signed in.
pub type SessionChange = (AuthEvent, Option<Session>);

#[derive(Default)]
struct Listeners {
    next_id: u64,
    senders: HashMap<u64, UnboundedSender<SessionChange>>,
}

/// Fan-out of session changes to every live subscription, in emission order.
#[derive(Clone, Default)]
pub struct ChangeFeed {
    listeners: Arc<Mutex<Listeners>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> SessionChanges {
        let (sender, receiver) = mpsc::unbounded();
        let mut listeners = self.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.senders.insert(id, sender);
        SessionChanges {
            id,
            receiver,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn emit(&self, event: AuthEvent, session: Option<Session>) {
        self.lock()
            .senders
            .retain(|_, sender| sender.unbounded_send((event, session.clone())).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().senders.len()
    }
}

impl fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A live subscription to the change stream.
///
/// Dropping it removes the listener from its feed, so a subscription can never
/// outlive the component that owns it.
pub struct SessionChanges {
    id: u64,
    receiver: UnboundedReceiver<SessionChange>,
    listeners: Weak<Mutex<Listeners>>,
}

impl SessionChanges {
    /// Next change if one is already queued, without waiting.
    pub fn try_next_change(&mut self) -> Option<SessionChange> {
        self.receiver.next().now_or_never().flatten()
    }
}

impl Stream for SessionChanges {
    type Item = SessionChange;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_next_unpin(cx)
    }
}

impl Drop for SessionChanges {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .senders
                .remove(&self.id);
        }
    }
}

impl fmt::Debug for SessionChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionChanges").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_arrive_in_order() {
        let feed = ChangeFeed::new();
        let mut changes = feed.subscribe();

        feed.emit(AuthEvent::SignedOut, None);
        feed.emit(AuthEvent::InitialSession, None);

        assert_eq!(changes.try_next_change(), Some((AuthEvent::SignedOut, None)));
        assert_eq!(
            changes.try_next_change(),
            Some((AuthEvent::InitialSession, None))
        );
        assert_eq!(changes.try_next_change(), None);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let feed = ChangeFeed::new();
        let first = feed.subscribe();
        let second = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 2);

        drop(first);
        assert_eq!(feed.subscriber_count(), 1);

        drop(second);
        assert_eq!(feed.subscriber_count(), 0);

        // Emitting with nobody listening is fine.
        feed.emit(AuthEvent::SignedOut, None);
    }

    #[test]
    fn test_subscription_outliving_feed() {
        let feed = ChangeFeed::new();
        let mut changes = feed.subscribe();
        drop(feed);
        assert_eq!(changes.try_next_change(), None);
        drop(changes);
    }
}
