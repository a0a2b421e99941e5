//! # Mock Mailboxes & Testing Guide
//!
//! [`mailbox`] returns a real [`Addr<A>`] whose messages land in a
//! [`MockMailbox`] owned by the test instead of a running actor. Hand the
//! address to the actor under test as one of its dependencies, then inspect,
//! answer, or deliberately ignore whatever it sends.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockMailbox | Real Actor |
//! |---------|-------------|------------|
//! | **Speed** | Instant | Fast (but involves tokio spawn) |
//! | **Determinism** | Fully scripted | Subject to scheduler |
//! | **State** | None | Real state management |
//! | **Failure Injection** | Easy (never respond, respond with errors) | Hard |
//!
//! ## Testing Strategies
//!
//! 1. **Single actor**: spawn the actor with [`spawn`](crate::spawn) and talk to it
//!    through its address.
//! 2. **Actor with mocked dependencies**: give the actor under test addresses
//!    from [`mailbox`] and script the dependencies by hand. Holding a
//!    `MockMailbox` without answering simulates a stalled downstream actor,
//!    which is the easiest way to exercise request timeouts.
//! 3. **Full system**: start everything and drive it through the public clients.
//!
//! ```rust
//! use actor_runtime::{mock, Actor, Context, Reply, RuntimeError};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! enum StoreMessage { Lookup { key: String, reply: Reply<Option<String>> } }
//!
//! struct Store;
//!
//! #[async_trait]
//! impl Actor for Store {
//!     type Message = StoreMessage;
//!     async fn handle(&mut self, _: StoreMessage, _: &mut Context<Self>) {}
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (store, mut inbox) = mock::mailbox::<Store>();
//!
//!     let lookup = tokio::spawn(async move {
//!         store
//!             .request(
//!                 |reply| StoreMessage::Lookup { key: "a".into(), reply },
//!                 Duration::from_millis(50),
//!             )
//!             .await
//!     });
//!
//!     // Receive the request but never answer it.
//!     let StoreMessage::Lookup { key, reply: _pending } = inbox.recv().await.unwrap();
//!     assert_eq!(key, "a");
//!
//!     let result = lookup.await.unwrap();
//!     assert!(matches!(result, Err(RuntimeError::Timeout(_))));
//! }
//! ```

use crate::actor::{Actor, ActorId};
use crate::address::Addr;
use crate::message::{Envelope, Signal};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Creates an address whose messages are captured by the returned [`MockMailbox`].
pub fn mailbox<A: Actor>() -> (Addr<A>, MockMailbox<A>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let id = ActorId::next();
    (Addr::new(id, sender), MockMailbox { id, receiver })
}

/// Receiving end of a mocked actor.
pub struct MockMailbox<A: Actor> {
    id: ActorId,
    receiver: mpsc::UnboundedReceiver<Envelope<A::Message>>,
}

impl<A: Actor> MockMailbox<A> {
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Next user message, skipping wake ticks and stop signals.
    pub async fn recv(&mut self) -> Option<A::Message> {
        self.recv_envelope()
            .await
            .map(|(_, message)| message)
    }

    /// Next user message together with the sender recorded on its envelope.
    pub async fn recv_envelope(&mut self) -> Option<(Option<ActorId>, A::Message)> {
        while let Some(envelope) = self.receiver.recv().await {
            if let Signal::Message(message) = envelope.signal {
                return Some((envelope.sender, message));
            }
        }
        None
    }

    /// Waits at most `timeout` for the next user message.
    pub async fn recv_within(&mut self, timeout: Duration) -> Option<A::Message> {
        tokio::time::timeout(timeout, self.recv())
            .await
            .ok()
            .flatten()
    }

    /// Drains every message already queued without waiting.
    pub fn drain(&mut self) -> Vec<A::Message> {
        let mut messages = Vec::new();
        while let Ok(envelope) = self.receiver.try_recv() {
            if let Signal::Message(message) = envelope.signal {
                messages.push(message);
            }
        }
        messages
    }

    /// Answers every incoming message with `handler` on a background task.
    pub fn serve<F>(mut self, mut handler: F) -> JoinHandle<()>
    where
        F: FnMut(A::Message) + Send + 'static,
    {
        tokio::spawn(async move {
            while let Some(message) = self.recv().await {
                handler(message);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Context, Reply, RuntimeError};
    use async_trait::async_trait;

    #[derive(Debug)]
    enum EchoMessage {
        Echo { text: String, reply: Reply<String> },
        Note(String),
    }

    struct Echo;

    #[async_trait]
    impl Actor for Echo {
        type Message = EchoMessage;
        async fn handle(&mut self, _: EchoMessage, _: &mut Context<Self>) {}
    }

    #[tokio::test]
    async fn test_mock_mailbox_captures_messages() {
        let (addr, mut inbox) = mailbox::<Echo>();
        assert_eq!(addr.id(), inbox.id());

        addr.send(EchoMessage::Note("first".into())).unwrap();
        addr.send(EchoMessage::Note("second".into())).unwrap();

        let notes: Vec<String> = inbox
            .drain()
            .into_iter()
            .filter_map(|m| match m {
                EchoMessage::Note(text) => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(notes, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_mailbox_serve_responds() {
        let (addr, inbox) = mailbox::<Echo>();
        let server = inbox.serve(|message| {
            if let EchoMessage::Echo { text, reply } = message {
                reply.respond(text.to_uppercase());
            }
        });

        let answer = addr
            .request(
                |reply| EchoMessage::Echo {
                    text: "hello".into(),
                    reply,
                },
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(answer, "HELLO");

        drop(addr);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unanswered_request_times_out() {
        let (addr, mut inbox) = mailbox::<Echo>();
        let result = addr
            .request(
                |reply| EchoMessage::Echo {
                    text: "ignored".into(),
                    reply,
                },
                Duration::from_millis(20),
            )
            .await;
        assert_eq!(result, Err(RuntimeError::Timeout(Duration::from_millis(20))));

        // The request still arrived; only the answer was missing.
        assert!(matches!(inbox.recv().await, Some(EchoMessage::Echo { .. })));
    }

    #[tokio::test]
    async fn test_dropped_reply_is_reported() {
        let (addr, inbox) = mailbox::<Echo>();
        let server = inbox.serve(drop);

        let result = addr
            .request(
                |reply| EchoMessage::Echo {
                    text: "dropped".into(),
                    reply,
                },
                Duration::from_secs(1),
            )
            .await;
        assert_eq!(result, Err(RuntimeError::ActorDropped));

        drop(addr);
        server.await.unwrap();
    }
}
