//! # Addresses
//!
//! An [`Addr`] is the client half of an actor: a cloneable handle that pushes
//! envelopes onto the actor's unbounded mailbox. Delivery order is preserved
//! per sender, since each address writes into the same FIFO channel.

use crate::actor::{Actor, ActorId};
use crate::error::RuntimeError;
use crate::message::{Envelope, Reply, Signal};
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// A message that could not be delivered because the actor has stopped.
///
/// The message is handed back so the caller can fail any reply it carries.
#[derive(Debug)]
pub struct Undelivered<M>(pub M);

/// Handle used to send messages to an actor of type `A`.
pub struct Addr<A: Actor> {
    id: ActorId,
    sender: mpsc::UnboundedSender<Envelope<A::Message>>,
}

impl<A: Actor> Clone for Addr<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> fmt::Debug for Addr<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Addr").field(&self.id).finish()
    }
}

impl<A: Actor> Addr<A> {
    pub(crate) fn new(id: ActorId, sender: mpsc::UnboundedSender<Envelope<A::Message>>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    /// True once the actor's loop has exited.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Fire-and-forget send with no sender identity attached.
    pub fn send(&self, message: A::Message) -> Result<(), RuntimeError> {
        self.deliver(None, message)
            .map_err(|_| RuntimeError::ActorClosed)
    }

    /// Delivers a message on behalf of `sender`.
    ///
    /// Used to forward a request without becoming part of its reply path: the
    /// receiving actor sees the original sender and responds straight to it.
    pub fn deliver(
        &self,
        sender: Option<ActorId>,
        message: A::Message,
    ) -> Result<(), Undelivered<A::Message>> {
        self.sender
            .send(Envelope::message(sender, message))
            .map_err(|err| match err.0.signal {
                Signal::Message(message) => Undelivered(message),
                Signal::Wake { .. } | Signal::Stop => unreachable!("deliver only enqueues messages"),
            })
    }

    /// Sends a request built by `make` and waits up to `timeout` for the reply.
    pub async fn request<R, F>(&self, make: F, timeout: Duration) -> Result<R, RuntimeError>
    where
        F: FnOnce(Reply<R>) -> A::Message,
    {
        self.request_from(None, make, timeout).await
    }

    /// Same as [`request`](Self::request), recording `sender` on the envelope.
    pub async fn request_from<R, F>(
        &self,
        sender: Option<ActorId>,
        make: F,
        timeout: Duration,
    ) -> Result<R, RuntimeError>
    where
        F: FnOnce(Reply<R>) -> A::Message,
    {
        let (reply, response) = Reply::channel();
        self.deliver(sender, make(reply))
            .map_err(|_| RuntimeError::ActorClosed)?;

        match tokio::time::timeout(timeout, response).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(RuntimeError::ActorDropped),
            Err(_) => {
                debug!(target_id = %self.id, ?timeout, "Request timed out");
                Err(RuntimeError::Timeout(timeout))
            }
        }
    }

    /// Asks the actor to stop once the messages already queued are handled.
    pub fn stop(&self) -> Result<(), RuntimeError> {
        self.sender
            .send(Envelope {
                sender: None,
                signal: Signal::Stop,
            })
            .map_err(|_| RuntimeError::ActorClosed)
    }
}
