//! Event channel built on crossbeam-channel.
//!
//! Carries import progress from worker threads to whatever is listening.

use super::Event;
use crossbeam_channel::{Receiver, Sender};

/// Sending half, handed to the import driver.
///
/// Cheap to clone and shareable across rayon workers.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Wrap a raw crossbeam sender
    pub fn new(sender: Sender<Event>) -> Self {
        Self { inner: sender }
    }

    /// Deliver an event. Blocks only while a bounded channel is full.
    ///
    /// With no receiver left the event is dropped, so listening is optional.
    pub fn send(&self, event: Event) {
        if self.inner.send(event).is_err() {
            tracing::trace!("event dropped, no receiver");
        }
    }
}

/// Listening half, held by the front end.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Wait for the next event; `None` once every sender is gone
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Next event if one is already queued
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Blocking iterator that ends when every sender is gone
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }

    /// Everything queued right now, without waiting
    pub fn drain(&self) -> Vec<Event> {
        self.inner.try_iter().collect()
    }
}

/// Constructors for sender/receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Unbounded channel; senders never wait.
    pub fn new() -> (EventSender, EventReceiver) {
        Self::wrap(crossbeam_channel::unbounded())
    }

    /// Channel holding at most `capacity` events; senders wait while it is full.
    ///
    /// A capacity of zero makes every send wait for the receiver.
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        Self::wrap(crossbeam_channel::bounded(capacity))
    }

    fn wrap((sender, receiver): (Sender<Event>, Receiver<Event>)) -> (EventSender, EventReceiver) {
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender whose events go nowhere
pub fn null_sender() -> EventSender {
    EventChannel::new().0
}
