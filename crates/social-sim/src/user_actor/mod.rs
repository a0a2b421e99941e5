//! # User Actor
//!
//! Accounts, session tokens, karma and the per-user feed.
//!
//! ## Structure
//!
//! - [`store`] - [`UserStore`], the shared account table
//! - [`messages`] - [`UserMessage`], the requests this actor answers
//!
//! ## Karma
//!
//! Karma only changes through [`UserMessage::UpdateKarma`]. Post and comment
//! actors push one delta per vote transition and a compensating delta when
//! voted content is deleted (see [`push_karma`]), so a user's karma converges
//! to the net score of their live content.
//!
//! ## Feed
//!
//! `GetFeed` is the one user operation that crosses kinds: it asks the
//! community pool which communities the user belongs to, then the post pool
//! for those communities' posts with their comment trees.

pub mod messages;
pub mod store;

pub use messages::*;
pub use store::*;

use crate::cascade::{ask, Deadline};
use crate::community_actor::{CommunityActor, CommunityMessage};
use crate::error::{DomainError, DomainResult};
use crate::model::{CommunityFeed, Created};
use crate::pool::Pool;
use crate::post_actor::{PostActor, PostMessage};
use actor_runtime::{Actor, Context};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct UserActor {
    store: SharedUsers,
    communities: Pool<CommunityActor>,
    posts: Pool<PostActor>,
    timeout: Duration,
}

impl UserActor {
    pub fn new(
        store: SharedUsers,
        communities: Pool<CommunityActor>,
        posts: Pool<PostActor>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            communities,
            posts,
            timeout,
        }
    }

    async fn feed(
        &mut self,
        user_id: String,
        ctx: &mut Context<Self>,
    ) -> DomainResult<Vec<CommunityFeed>> {
        let known = self.store.read().contains(&user_id);
        if !known {
            return Err(DomainError::not_found("User not found"));
        }

        let deadline = Deadline::after(self.timeout);
        let communities = ask(
            ctx,
            self.communities.next(),
            move |reply| CommunityMessage::ListForMember { user_id, reply },
            deadline.remaining(),
        )
        .await?;
        if communities.is_empty() {
            return Ok(Vec::new());
        }

        let names = communities.iter().map(|c| c.name.clone()).collect();
        let mut posts = ask(
            ctx,
            self.posts.next(),
            move |reply| PostMessage::PostsWithComments {
                communities: names,
                reply,
            },
            deadline.remaining(),
        )
        .await?;

        Ok(communities
            .into_iter()
            .map(|community| CommunityFeed {
                posts: posts.remove(&community.name).unwrap_or_default(),
                name: community.name,
                description: community.description,
            })
            .collect())
    }
}

#[async_trait]
impl Actor for UserActor {
    type Message = UserMessage;

    async fn handle(&mut self, msg: UserMessage, ctx: &mut Context<Self>) {
        match msg {
            UserMessage::Register {
                username,
                password,
                reply,
            } => {
                let result = self.store.write().register(&username, &password);
                match &result {
                    Ok(()) => info!(user_id = %username, "Registered"),
                    Err(e) => warn!(user_id = %username, error = %e, "Register failed"),
                }
                reply.respond(result.map(|()| Created {
                    id: username,
                    served_by: ctx.id(),
                }));
            }
            UserMessage::Login {
                username,
                password,
                reply,
            } => {
                let result = self.store.read().login(&username, &password);
                debug!(user_id = %username, ok = result.is_ok(), "Login");
                reply.respond(result);
            }
            UserMessage::ValidateToken { token, reply } => {
                let result = self.store.read().validate_token(&token);
                debug!(ok = result.is_ok(), "ValidateToken");
                reply.respond(result);
            }
            UserMessage::UpdateKarma { user_id, delta } => {
                let karma = self.store.write().adjust_karma(&user_id, delta);
                match karma {
                    Some(karma) => debug!(%user_id, delta, karma, "Karma updated"),
                    None => warn!(%user_id, delta, "Karma update for unknown user"),
                }
            }
            UserMessage::GetKarma { user_id, reply } => {
                let result = self.store.read().karma(&user_id);
                reply.respond(result);
            }
            UserMessage::GetFeed { user_id, reply } => {
                let result = self.feed(user_id.clone(), ctx).await;
                if let Err(e) = &result {
                    warn!(%user_id, error = %e, "Feed failed");
                }
                reply.respond(result);
            }
        }
    }
}

/// Sends one `UpdateKarma` per author with a non-zero total.
///
/// Deliveries are deferred until the calling handler returns.
pub fn push_karma<S: Actor>(
    ctx: &mut Context<S>,
    users: &mut Pool<UserActor>,
    deltas: impl IntoIterator<Item = (String, i64)>,
) {
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for (user_id, delta) in deltas {
        *totals.entry(user_id).or_default() += delta;
    }

    for (user_id, delta) in totals.into_iter().filter(|(_, delta)| *delta != 0) {
        match users.next() {
            Some(user_actor) => ctx.send(&user_actor, UserMessage::UpdateKarma { user_id, delta }),
            None => warn!(%user_id, delta, "No user actor for karma update"),
        }
    }
}
