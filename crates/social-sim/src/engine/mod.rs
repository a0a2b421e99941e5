//! # Engine
//!
//! The stateless router in front of the domain pools.
//!
//! An engine owns one fixed-size pool per domain kind. Requests are
//! forwarded, not relayed: the engine hands the message (and its embedded
//! [`Reply`]) to a pool member with the original sender preserved, so the
//! member answers the caller directly. A request carrying a pin goes to that
//! exact member instead of the next one in rotation.
//!
//! Two requests are relayed instead: unpinned `Search` and `Edit`. The engine
//! waits for the member's answer itself and converts a missed deadline into a
//! fixed timeout error.
//!
//! The engine holds no domain state. Its only failures are
//! `"Actor unavailable"` (unknown pin or stopped member) and the relay
//! timeouts; it never retries.

pub mod messages;

pub use messages::*;

use crate::comment_actor::{CommentActor, CommentMessage};
use crate::community_actor::CommunityActor;
use crate::config::BackendConfig;
use crate::dm_actor::DirectMessageActor;
use crate::error::{DomainError, DomainResult, ACTOR_UNAVAILABLE};
use crate::lifecycle::Stores;
use crate::model::TargetKind;
use crate::pool::{Pool, Reject, Routed};
use crate::post_actor::{PostActor, PostMessage};
use crate::user_actor::UserActor;
use actor_runtime::{spawn, Actor, Addr, Context, Mailbox, Reply, RuntimeError, Undelivered};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const SEARCH_TIMEOUT: &str = "Search request timeout";
pub const EDIT_TIMEOUT: &str = "Edit request timeout";

pub struct EngineActor {
    users: Pool<UserActor>,
    communities: Pool<CommunityActor>,
    posts: Pool<PostActor>,
    comments: Pool<CommentActor>,
    inbox: Pool<DirectMessageActor>,
    timeout: Duration,
    members: Vec<JoinHandle<()>>,
}

fn mailboxes<A: Actor>(size: usize) -> (Vec<Mailbox<A>>, Pool<A>) {
    let (mailboxes, addrs): (Vec<_>, Vec<_>) = (0..size).map(|_| Mailbox::new()).unzip();
    (mailboxes, Pool::new(addrs))
}

impl EngineActor {
    /// Builds every pool over the shared `stores`, wires them together and
    /// starts the engine.
    ///
    /// Mailboxes are created before any actor so that pools which call each
    /// other (users and posts, for feeds and karma) can be wired both ways.
    pub fn start(stores: &Stores, config: &BackendConfig) -> (Addr<EngineActor>, JoinHandle<()>) {
        let timeout = config.request_timeout();
        let (user_boxes, users) = mailboxes::<UserActor>(config.pool_size);
        let (community_boxes, communities) = mailboxes::<CommunityActor>(config.pool_size);
        let (post_boxes, posts) = mailboxes::<PostActor>(config.pool_size);
        let (comment_boxes, comments) = mailboxes::<CommentActor>(config.pool_size);
        let (inbox_boxes, inbox) = mailboxes::<DirectMessageActor>(config.pool_size);

        let mut members = Vec::new();
        for mailbox in user_boxes {
            let actor = UserActor::new(
                stores.users.clone(),
                communities.clone(),
                posts.clone(),
                timeout,
            );
            members.push(tokio::spawn(mailbox.run(actor)));
        }
        for mailbox in community_boxes {
            let actor = CommunityActor::new(stores.communities.clone(), posts.clone(), timeout);
            members.push(tokio::spawn(mailbox.run(actor)));
        }
        for mailbox in post_boxes {
            let actor = PostActor::new(
                stores.posts.clone(),
                comments.clone(),
                users.clone(),
                timeout,
            );
            members.push(tokio::spawn(mailbox.run(actor)));
        }
        for mailbox in comment_boxes {
            let actor = CommentActor::new(stores.comments.clone(), users.clone());
            members.push(tokio::spawn(mailbox.run(actor)));
        }
        for mailbox in inbox_boxes {
            let actor = DirectMessageActor::new(stores.inbox.clone());
            members.push(tokio::spawn(mailbox.run(actor)));
        }

        spawn(EngineActor {
            users,
            communities,
            posts,
            comments,
            inbox,
            timeout,
            members,
        })
    }

    fn stop_members(&self) {
        let users = self.users.members().iter().map(Addr::stop);
        let communities = self.communities.members().iter().map(Addr::stop);
        let posts = self.posts.members().iter().map(Addr::stop);
        let comments = self.comments.members().iter().map(Addr::stop);
        let inbox = self.inbox.members().iter().map(Addr::stop);
        let already_stopped = users
            .chain(communities)
            .chain(posts)
            .chain(comments)
            .chain(inbox)
            .filter(Result::is_err)
            .count();
        if already_stopped > 0 {
            warn!(already_stopped, "Pool members stopped before their engine");
        }
    }
}

/// Hands `routed` to its pool member once the handler returns, keeping the
/// original sender.
fn forward<A>(ctx: &mut Context<EngineActor>, pool: &mut Pool<A>, routed: Routed<A::Message>)
where
    A: Actor,
    A::Message: Reject,
{
    let Routed { pin, message } = routed;
    let Some(member) = pool.route(pin) else {
        warn!(?pin, "No pool member for request");
        message.reject(DomainError::Unavailable(ACTOR_UNAVAILABLE.to_string()));
        return;
    };
    let sender = ctx.sender();
    ctx.defer(move || {
        if let Err(Undelivered(message)) = member.deliver(sender, message) {
            warn!(target_id = %member.id(), "Pool member stopped");
            message.reject(DomainError::Unavailable(ACTOR_UNAVAILABLE.to_string()));
        }
    });
}

/// Asks `target` on the engine's own behalf; a missed deadline becomes
/// `timeout_message`.
fn relay<A, R, F>(
    ctx: &Context<EngineActor>,
    target: Option<Addr<A>>,
    make: F,
    timeout: Duration,
    timeout_message: &'static str,
) -> impl Future<Output = DomainResult<R>> + Send + 'static
where
    A: Actor,
    R: Send + 'static,
    F: FnOnce(Reply<DomainResult<R>>) -> A::Message + Send + 'static,
{
    let request = target.map(|target| ctx.request(&target, make, timeout));
    async move {
        let Some(request) = request else {
            return Err(DomainError::Unavailable(ACTOR_UNAVAILABLE.to_string()));
        };
        match request.await {
            Ok(result) => result,
            Err(RuntimeError::Timeout(_)) => Err(DomainError::Timeout(timeout_message.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl Actor for EngineActor {
    type Message = EngineRequest;

    async fn started(&mut self, ctx: &mut Context<Self>) {
        info!(engine = %ctx.id(), pool_size = self.users.len(), "Engine started");
    }

    async fn handle(&mut self, msg: EngineRequest, ctx: &mut Context<Self>) {
        match msg {
            EngineRequest::Post(Routed {
                pin: None,
                message: PostMessage::Search { query, reply },
            }) => {
                debug!(%query, "Relaying search");
                let search = relay(
                    ctx,
                    self.posts.next(),
                    move |inner| PostMessage::Search { query, reply: inner },
                    self.timeout,
                    SEARCH_TIMEOUT,
                );
                reply.respond(search.await);
            }
            EngineRequest::Post(Routed {
                pin: None,
                message:
                    PostMessage::Edit {
                        post_id,
                        author_id,
                        title,
                        content,
                        reply,
                    },
            }) => {
                let edit = relay(
                    ctx,
                    self.posts.next(),
                    move |inner| PostMessage::Edit {
                        post_id,
                        author_id,
                        title,
                        content,
                        reply: inner,
                    },
                    self.timeout,
                    EDIT_TIMEOUT,
                );
                reply.respond(edit.await);
            }
            EngineRequest::Comment(Routed {
                pin: None,
                message:
                    CommentMessage::Edit {
                        comment_id,
                        author_id,
                        content,
                        reply,
                    },
            }) => {
                let edit = relay(
                    ctx,
                    self.comments.next(),
                    move |inner| CommentMessage::Edit {
                        comment_id,
                        author_id,
                        content,
                        reply: inner,
                    },
                    self.timeout,
                    EDIT_TIMEOUT,
                );
                reply.respond(edit.await);
            }
            EngineRequest::User(routed) => forward(ctx, &mut self.users, routed),
            EngineRequest::Community(routed) => forward(ctx, &mut self.communities, routed),
            EngineRequest::Post(routed) => forward(ctx, &mut self.posts, routed),
            EngineRequest::Comment(routed) => forward(ctx, &mut self.comments, routed),
            EngineRequest::DirectMessage(routed) => forward(ctx, &mut self.inbox, routed),
            EngineRequest::Vote(Routed { pin, message }) => match message.target_type {
                TargetKind::Post => {
                    let routed = Routed::new(pin, message.into_post_message());
                    forward(ctx, &mut self.posts, routed)
                }
                TargetKind::Comment => {
                    let routed = Routed::new(pin, message.into_comment_message());
                    forward(ctx, &mut self.comments, routed)
                }
            },
        }
    }

    async fn stopped(&mut self, ctx: &mut Context<Self>) {
        self.stop_members();
        let members = std::mem::take(&mut self.members);
        let count = members.len();
        for member in members {
            if let Err(e) = member.await {
                warn!(error = %e, "Pool member panicked");
            }
        }
        info!(engine = %ctx.id(), members = count, "Engine stopped");
    }
}
