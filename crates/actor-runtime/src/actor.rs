//! # Actor Behaviour
//!
//! An [`Actor`] is a piece of state plus the logic that reacts to its messages.
//! The runtime guarantees that at most one hook of a given actor runs at a time,
//! so an actor can mutate `&mut self` freely without locks.
//!
//! ## Lifecycle
//!
//! 1. [`Actor::started`] runs once, before the first message.
//! 2. [`Actor::handle`] runs for every message, in mailbox order.
//! 3. [`Actor::wake`] runs whenever the wake timer armed through
//!    [`Context::set_wake_timer`] fires.
//! 4. [`Actor::stopped`] runs once the actor has been asked to stop or every
//!    address to it has been dropped.
//!
//! Side effects requested through the [`Context`] (sends, spawns) are queued and
//! only become visible after the current hook returns.

use crate::context::Context;
use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a spawned actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u64);

impl ActorId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid-{}", self.0)
    }
}

/// Behaviour of an actor.
///
/// # Example
///
/// ```rust
/// use actor_runtime::{spawn, Actor, Context, Reply};
/// use async_trait::async_trait;
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// enum CounterMessage {
///     Add(u64),
///     Total { reply: Reply<u64> },
/// }
///
/// #[derive(Default)]
/// struct Counter {
///     total: u64,
/// }
///
/// #[async_trait]
/// impl Actor for Counter {
///     type Message = CounterMessage;
///
///     async fn handle(&mut self, msg: CounterMessage, _ctx: &mut Context<Self>) {
///         match msg {
///             CounterMessage::Add(n) => self.total += n,
///             CounterMessage::Total { reply } => {
///                 reply.respond(self.total);
///             }
///         }
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (counter, handle) = spawn(Counter::default());
///     counter.send(CounterMessage::Add(2)).unwrap();
///     counter.send(CounterMessage::Add(3)).unwrap();
///
///     let total = counter
///         .request(|reply| CounterMessage::Total { reply }, Duration::from_secs(1))
///         .await
///         .unwrap();
///     assert_eq!(total, 5);
///
///     drop(counter);
///     handle.await.unwrap();
/// }
/// ```
#[async_trait]
pub trait Actor: Sized + Send + 'static {
    /// The message type accepted by this actor's mailbox.
    type Message: fmt::Debug + Send + 'static;

    /// Called once before the first message is processed.
    async fn started(&mut self, _ctx: &mut Context<Self>) {}

    /// Called for every message, one at a time.
    async fn handle(&mut self, msg: Self::Message, ctx: &mut Context<Self>);

    /// Called when the wake timer fires.
    async fn wake(&mut self, _ctx: &mut Context<Self>) {}

    /// Called once after the loop exits.
    async fn stopped(&mut self, _ctx: &mut Context<Self>) {}
}

/// Short type name used as the `actor_type` field in logs.
pub(crate) fn actor_type<A>() -> &'static str {
    // "social_sim::post_actor::PostActor" -> "PostActor"
    std::any::type_name::<A>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}
