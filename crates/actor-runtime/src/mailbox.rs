//! # Mailbox & Run Loop
//!
//! A [`Mailbox`] is the server half of an actor: the receiving end of an
//! unbounded channel plus the loop that feeds envelopes to the actor's hooks.
//!
//! Creating the mailbox before the actor lets a system hand out addresses
//! first and build the actors afterwards, which is how mutually dependent
//! actors get wired (late binding):
//!
//! ```rust
//! use actor_runtime::{Actor, Addr, Context, Mailbox};
//! use async_trait::async_trait;
//!
//! struct Ping { pong: Addr<Pong> }
//! struct Pong { ping: Addr<Ping> }
//!
//! #[async_trait]
//! impl Actor for Ping {
//!     type Message = ();
//!     async fn handle(&mut self, _: (), ctx: &mut Context<Self>) { ctx.stop(); }
//! }
//!
//! #[async_trait]
//! impl Actor for Pong {
//!     type Message = ();
//!     async fn handle(&mut self, _: (), ctx: &mut Context<Self>) { ctx.stop(); }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (ping_box, ping) = Mailbox::<Ping>::new();
//!     let (pong_box, pong) = Mailbox::<Pong>::new();
//!
//!     let a = tokio::spawn(ping_box.run(Ping { pong: pong.clone() }));
//!     let b = tokio::spawn(pong_box.run(Pong { ping: ping.clone() }));
//!
//!     // The cycle keeps both channels open, so stop explicitly.
//!     ping.stop().unwrap();
//!     pong.stop().unwrap();
//!     a.await.unwrap();
//!     b.await.unwrap();
//! }
//! ```

use crate::actor::{actor_type, Actor, ActorId};
use crate::address::Addr;
use crate::context::Context;
use crate::message::{Envelope, Signal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct Mailbox<A: Actor> {
    id: ActorId,
    receiver: mpsc::UnboundedReceiver<Envelope<A::Message>>,
    myself: mpsc::WeakUnboundedSender<Envelope<A::Message>>,
}

impl<A: Actor> Mailbox<A> {
    /// Creates an empty mailbox and the first address pointing at it.
    pub fn new() -> (Self, Addr<A>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = ActorId::next();
        let mailbox = Self {
            id,
            receiver,
            myself: sender.downgrade(),
        };
        (mailbox, Addr::new(id, sender))
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Runs `actor` until it stops or every address to it is dropped.
    pub async fn run(mut self, mut actor: A) {
        let actor_type = actor_type::<A>();
        let mut ctx = Context::new(self.id, self.myself.clone());
        info!(actor_type, id = %self.id, "Actor started");

        actor.started(&mut ctx).await;
        ctx.flush();

        let mut handled: u64 = 0;
        while !ctx.is_stopping() {
            let Some(envelope) = self.receiver.recv().await else {
                break;
            };
            ctx.begin(envelope.sender);
            match envelope.signal {
                Signal::Message(msg) => {
                    debug!(actor_type, id = %self.id, sender = ?envelope.sender, ?msg, "Handle");
                    actor.handle(msg, &mut ctx).await;
                    handled += 1;
                }
                Signal::Wake { generation } => {
                    if ctx.accept_wake(generation) {
                        actor.wake(&mut ctx).await;
                    }
                }
                Signal::Stop => ctx.stop(),
            }
            ctx.flush();
        }

        ctx.cancel_wake_timer();
        actor.stopped(&mut ctx).await;
        ctx.flush();
        info!(actor_type, id = %self.id, handled, "Actor stopped");
    }
}

/// Creates a mailbox for `actor` and runs it on a new Tokio task.
pub fn spawn<A: Actor>(actor: A) -> (Addr<A>, JoinHandle<()>) {
    let (mailbox, addr) = Mailbox::new();
    let handle = tokio::spawn(mailbox.run(actor));
    (addr, handle)
}
