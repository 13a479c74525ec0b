//! Membership and fan-out for a single channel name.

use crate::subscriber::{ChannelName, Envelope, Subscriber, SubscriberId};

/// One named channel and the subscribers currently attached to it.
///
/// Subscribers are kept in join order, so a post reaches them in a stable
/// order. Subscribers whose receiving side is gone are pruned on the next
/// delivery attempt.
#[derive(Debug)]
pub(crate) struct NamedChannel<T> {
    name: ChannelName,
    subscribers: Vec<Subscriber<T>>,
}

impl<T: Clone> NamedChannel<T> {
    pub(crate) fn new(name: ChannelName) -> Self {
        Self {
            name,
            subscribers: Vec::new(),
        }
    }

    pub(crate) fn name(&self) -> &ChannelName {
        &self.name
    }

    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub(crate) fn delivered(&self) -> u64 {
        self.subscribers.iter().map(Subscriber::delivered).sum()
    }

    pub(crate) fn join(&mut self, subscriber: Subscriber<T>) {
        self.subscribers.push(subscriber);
    }

    /// Remove a subscriber. Returns `false` if it was not a member.
    pub(crate) fn leave(&mut self, id: &SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id() != id);
        self.subscribers.len() != before
    }

    /// Deliver an envelope to every subscriber, including its sender.
    ///
    /// Returns the number of subscribers the envelope was queued for.
    pub(crate) fn broadcast_to_all(&mut self, envelope: Envelope<T>) -> usize {
        self.deliver_where(envelope, |_| true)
    }

    /// Deliver an envelope to every subscriber except its sender.
    ///
    /// Returns the number of subscribers the envelope was queued for.
    pub(crate) fn broadcast_to_others(&mut self, envelope: Envelope<T>) -> usize {
        let sender = envelope.sender.clone();
        self.deliver_where(envelope, |id| *id != sender)
    }

    fn deliver_where<F>(&mut self, envelope: Envelope<T>, include: F) -> usize
    where
        F: Fn(&SubscriberId) -> bool,
    {
        let mut delivered = 0;
        let mut gone = Vec::new();
        for subscriber in self.subscribers.iter_mut() {
            if !include(subscriber.id()) {
                continue;
            }
            if subscriber.deliver(envelope.clone()) {
                delivered += 1;
            } else {
                gone.push(subscriber.id().clone());
            }
        }

        if !gone.is_empty() {
            tracing::debug!(
                "Pruning {} closed subscriber(s) from channel {}",
                gone.len(),
                self.name
            );
            self.subscribers.retain(|s| !gone.contains(s.id()));
        }

        delivered
    }
}
