//! # Actor Context
//!
//! The [`Context`] is handed to every hook. It gives an actor access to its own
//! identity, the sender of the message being handled, its wake timer, and the
//! deferred effect queue.
//!
//! Effects queued with [`Context::send`], [`Context::defer`] and
//! [`Context::spawn`] are applied in order once the current hook returns, so no
//! other actor can observe them mid-handler. [`Context::request`] is the
//! exception: it is delivered immediately because the handler waits on it.

use crate::actor::{actor_type, Actor, ActorId};
use crate::address::Addr;
use crate::error::RuntimeError;
use crate::mailbox::Mailbox;
use crate::message::{Envelope, Reply, Signal};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

type Deferred = Box<dyn FnOnce() + Send>;

pub struct Context<A: Actor> {
    id: ActorId,
    myself: mpsc::WeakUnboundedSender<Envelope<A::Message>>,
    sender: Option<ActorId>,
    outbox: Vec<Deferred>,
    wake_timer: Option<JoinHandle<()>>,
    wake_pending: Arc<AtomicBool>,
    wake_generation: u64,
    stopping: bool,
}

impl<A: Actor> Context<A> {
    pub(crate) fn new(
        id: ActorId,
        myself: mpsc::WeakUnboundedSender<Envelope<A::Message>>,
    ) -> Self {
        Self {
            id,
            myself,
            sender: None,
            outbox: Vec::new(),
            wake_timer: None,
            wake_pending: Arc::new(AtomicBool::new(false)),
            wake_generation: 0,
            stopping: false,
        }
    }

    /// This actor's own identity.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// The sender of the message currently being handled, if it came from an actor.
    pub fn sender(&self) -> Option<ActorId> {
        self.sender
    }

    /// A strong address to this actor, or `None` once nothing else references it.
    pub fn address(&self) -> Option<Addr<A>> {
        self.myself
            .upgrade()
            .map(|sender| Addr::new(self.id, sender))
    }

    /// Queues a fire-and-forget message, delivered after the current hook returns.
    pub fn send<B: Actor>(&mut self, to: &Addr<B>, message: B::Message) {
        let to = to.clone();
        let sender = Some(self.id);
        self.defer(move || {
            if to.deliver(sender, message).is_err() {
                warn!(target_id = %to.id(), "Dropped message for stopped actor");
            }
        });
    }

    /// Queues an arbitrary effect, applied after the current hook returns.
    pub fn defer(&mut self, effect: impl FnOnce() + Send + 'static) {
        self.outbox.push(Box::new(effect));
    }

    /// Creates a child actor. Its address is usable immediately; the actor
    /// itself starts running after the current hook returns.
    pub fn spawn<B: Actor>(&mut self, actor: B) -> Addr<B> {
        let (mailbox, addr) = Mailbox::new();
        debug!(parent = %self.id, child = %addr.id(), actor_type = actor_type::<B>(), "Spawn");
        self.defer(move || {
            tokio::spawn(mailbox.run(actor));
        });
        addr
    }

    /// Sends a request stamped with this actor as sender and waits for the reply.
    ///
    /// The returned future does not borrow the context, so it can be awaited
    /// while the handler keeps `&mut Context` around.
    pub fn request<B, R, F>(
        &self,
        to: &Addr<B>,
        make: F,
        timeout: Duration,
    ) -> impl Future<Output = Result<R, RuntimeError>> + Send + 'static
    where
        B: Actor,
        R: Send + 'static,
        F: FnOnce(Reply<R>) -> B::Message + Send + 'static,
    {
        let to = to.clone();
        let sender = Some(self.id);
        async move { to.request_from(sender, make, timeout).await }
    }

    /// Arms (or re-arms) a periodic wake timer.
    ///
    /// Each period a tick is delivered to [`Actor::wake`]. Ticks do not pile up:
    /// while one is waiting in the mailbox the next is skipped.
    pub fn set_wake_timer(&mut self, period: Duration) {
        self.cancel_wake_timer();

        let myself = self.myself.clone();
        let pending = self.wake_pending.clone();
        let generation = self.wake_generation;
        let id = self.id;
        self.wake_timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if pending.swap(true, Ordering::AcqRel) {
                    continue;
                }
                let Some(mailbox) = myself.upgrade() else {
                    break;
                };
                let tick = Envelope {
                    sender: Some(id),
                    signal: Signal::Wake { generation },
                };
                if mailbox.send(tick).is_err() {
                    break;
                }
            }
        }));
    }

    /// Disarms the wake timer. Ticks already queued are discarded.
    pub fn cancel_wake_timer(&mut self) {
        if let Some(timer) = self.wake_timer.take() {
            timer.abort();
        }
        self.wake_generation += 1;
        self.wake_pending.store(false, Ordering::Release);
    }

    /// Stops the actor after the current hook returns.
    pub fn stop(&mut self) {
        self.stopping = true;
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping
    }

    pub(crate) fn begin(&mut self, sender: Option<ActorId>) {
        self.sender = sender;
    }

    /// Returns whether a tick belongs to the currently armed timer.
    pub(crate) fn accept_wake(&self, generation: u64) -> bool {
        if generation != self.wake_generation || self.wake_timer.is_none() {
            return false;
        }
        self.wake_pending.store(false, Ordering::Release);
        true
    }

    /// Applies queued effects in the order they were requested.
    pub(crate) fn flush(&mut self) {
        self.sender = None;
        for effect in self.outbox.drain(..) {
            effect();
        }
    }
}

impl<A: Actor> Drop for Context<A> {
    fn drop(&mut self) {
        if let Some(timer) = self.wake_timer.take() {
            timer.abort();
        }
    }
}
