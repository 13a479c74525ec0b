//! Participant-side handle on a named channel.

use crate::error::{ChannelError, Result};
use crate::hub::ChannelHub;
use crate::subscriber::{ChannelName, Envelope, SubscriberId};
use tokio::sync::mpsc;

/// A live membership in a named channel.
///
/// Posting is non-blocking. Received envelopes wait in a per-subscription
/// queue until they are taken with [`try_recv`](Self::try_recv),
/// [`drain`](Self::drain) or [`recv`](Self::recv).
///
/// The membership ends on [`close`](Self::close) or when the subscription is
/// dropped, whichever comes first.
pub struct Subscription<T: Clone + Send + 'static> {
    id: SubscriberId,
    name: ChannelName,
    hub: ChannelHub<T>,
    receiver: mpsc::UnboundedReceiver<Envelope<T>>,
    next_seq: u64,
    closed: bool,
}

impl<T: Clone + Send + 'static> Subscription<T> {
    pub(crate) fn new(
        id: SubscriberId,
        name: ChannelName,
        hub: ChannelHub<T>,
        receiver: mpsc::UnboundedReceiver<Envelope<T>>,
    ) -> Self {
        Self {
            id,
            name,
            hub,
            receiver,
            next_seq: 0,
            closed: false,
        }
    }

    /// Get the subscriber ID.
    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    /// Get the channel name.
    pub fn name(&self) -> &ChannelName {
        &self.name
    }

    /// Check if the subscription has been closed locally.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Post a message to the channel.
    ///
    /// # Arguments
    ///
    /// * `payload` - The message to post.
    ///
    /// # Returns
    ///
    /// The number of subscribers the message was queued for, or
    /// `ChannelError::Closed` if this subscription or its channel is closed.
    pub fn post(&mut self, payload: T) -> Result<usize> {
        if self.closed {
            return Err(ChannelError::Closed(self.name.clone()));
        }

        let envelope = Envelope {
            sender: self.id.clone(),
            seq: self.next_seq,
            payload,
        };
        self.next_seq += 1;
        self.hub.publish(&self.name, envelope)
    }

    /// Take the next queued envelope without waiting.
    pub fn try_recv(&mut self) -> Option<Envelope<T>> {
        self.receiver.try_recv().ok()
    }

    /// Take every queued envelope without waiting, in delivery order.
    pub fn drain(&mut self) -> Vec<Envelope<T>> {
        let mut envelopes = Vec::new();
        while let Some(envelope) = self.try_recv() {
            envelopes.push(envelope);
        }
        envelopes
    }

    /// Wait for the next envelope.
    ///
    /// Returns `None` once the subscription is closed, or once the channel has
    /// been closed and the queue is empty.
    pub async fn recv(&mut self) -> Option<Envelope<T>> {
        if self.closed {
            return None;
        }
        self.receiver.recv().await
    }

    /// Leave the channel. Closing an already closed subscription is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.receiver.close();
        self.hub.leave(&self.name, &self.id);
    }
}

impl<T: Clone + Send + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: Clone + Send + 'static> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("next_seq", &self.next_seq)
            .field("closed", &self.closed)
            .finish()
    }
}
