//! # Envelopes & Replies
//!
//! Everything that travels through a mailbox is wrapped in an [`Envelope`],
//! which records who sent it. Request messages embed a [`Reply`] handle; the
//! handle is consumed on use, so each request gets at most one response and
//! only the actor holding the request can give it.

use crate::actor::ActorId;
use std::fmt;
use tokio::sync::oneshot;

/// A mailbox entry.
#[derive(Debug)]
pub struct Envelope<M> {
    /// The actor that sent the message, if it was sent from inside an actor.
    pub sender: Option<ActorId>,
    pub signal: Signal<M>,
}

impl<M> Envelope<M> {
    pub fn message(sender: Option<ActorId>, message: M) -> Self {
        Self {
            sender,
            signal: Signal::Message(message),
        }
    }
}

/// What the run loop should do with an envelope.
#[derive(Debug)]
pub enum Signal<M> {
    /// A user message for [`Actor::handle`](crate::Actor::handle).
    Message(M),
    /// A wake timer tick for [`Actor::wake`](crate::Actor::wake). Ticks from a
    /// timer that has since been reset or cancelled are discarded.
    Wake { generation: u64 },
    /// Stop after the messages queued before this one.
    Stop,
}

/// Single-use response handle carried inside a request message.
pub struct Reply<R> {
    sender: oneshot::Sender<R>,
}

impl<R> Reply<R> {
    /// Creates a reply handle and the receiver that will observe the response.
    pub fn channel() -> (Self, oneshot::Receiver<R>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Sends the response. Returns `false` if the requester stopped waiting.
    pub fn respond(self, value: R) -> bool {
        self.sender.send(value).is_ok()
    }

    /// True once the requester has given up (timed out or dropped).
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<R> fmt::Debug for Reply<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reply")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}
